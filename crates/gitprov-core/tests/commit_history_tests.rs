//! Commit history integration tests

mod common;

use common::{at, commit, grace, PROJECT};
use gitprov_core::{BuildWarning, ChangeRecord, CommitHistoryBuilder, CommitRecord, ProvError};
use gitprov_model::{Activity, Entity, EntityType, ModelError, NodeId, ProvRole, RelationKind};

fn version(path: &str, hash: &str) -> NodeId {
    Entity::file_version_id(PROJECT, path, hash)
}

fn predecessors(document: &gitprov_model::ProvDocument, id: &NodeId) -> Vec<String> {
    document
        .outgoing(RelationKind::WasDerivedFrom, id)
        .map(|r| r.object.as_str().to_string())
        .collect()
}

fn build(commits: &[CommitRecord]) -> gitprov_core::BuildOutput {
    CommitHistoryBuilder::new(PROJECT).build(commits).unwrap()
}

fn add_modify_delete() -> Vec<CommitRecord> {
    vec![
        commit("c1", 1, &[]).with_change(ChangeRecord::added("a.txt")),
        commit("c2", 2, &["c1"]).with_change(ChangeRecord::modified("a.txt")),
        commit("c3", 3, &["c2"]).with_change(ChangeRecord::deleted("a.txt")),
    ]
}

// === Version chains ===

#[test]
fn test_add_modify_delete_chain() {
    let output = build(&add_modify_delete());
    let document = &output.document;
    assert!(output.warnings.is_empty());

    let files: Vec<_> = document.entities_of_type(EntityType::File).collect();
    assert_eq!(files.len(), 1);
    assert_eq!(document.entities_of_type(EntityType::FileVersion).count(), 3);
    assert_eq!(document.activities().count(), 3);

    assert_eq!(
        predecessors(document, &version("a.txt", "c2")),
        vec![version("a.txt", "c1").as_str().to_string()]
    );
    assert_eq!(document.relations_of_kind(RelationKind::WasDerivedFrom).count(), 1);

    let invalidation = document
        .outgoing(RelationKind::WasInvalidatedBy, &version("a.txt", "c3"))
        .next()
        .unwrap();
    assert_eq!(invalidation.object, Activity::git_commit_id("c3"));
    assert_eq!(invalidation.role, Some(ProvRole::FileVersionAtPointOfDeletion));

    document.validate().unwrap();
}

#[test]
fn test_every_version_specializes_its_file() {
    let output = build(&add_modify_delete());
    let file = Entity::file(PROJECT, "a.txt").id;
    for hash in ["c1", "c2", "c3"] {
        let specializations: Vec<_> = output
            .document
            .outgoing(RelationKind::SpecializationOf, &version("a.txt", hash))
            .collect();
        assert_eq!(specializations.len(), 1);
        assert_eq!(specializations[0].object, file);
    }
}

#[test]
fn test_input_order_does_not_matter() {
    let forward = build(&add_modify_delete());
    let mut reversed = add_modify_delete();
    reversed.reverse();
    let backward = build(&reversed);
    assert_eq!(forward.document, backward.document);
    assert_eq!(forward.warnings, backward.warnings);
}

#[test]
fn test_commits_are_informed_by_parents() {
    let output = build(&add_modify_delete());
    let informants: Vec<_> = output
        .document
        .outgoing(RelationKind::WasInformedBy, &Activity::git_commit_id("c3"))
        .map(|r| r.object.clone())
        .collect();
    assert_eq!(informants, vec![Activity::git_commit_id("c2")]);
}

#[test]
fn test_modification_uses_previous_version() {
    let output = build(&add_modify_delete());
    let used: Vec<_> = output
        .document
        .outgoing(RelationKind::Used, &Activity::git_commit_id("c2"))
        .collect();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].object, version("a.txt", "c1"));
    assert_eq!(used[0].role, Some(ProvRole::FileVersionToBeModified));
    assert_eq!(used[0].time, Some(at(2)));
}

// === Merges ===

#[test]
fn test_merge_derives_from_both_lines() {
    let commits = vec![
        commit("c1", 1, &[]).with_change(ChangeRecord::added("a.txt")),
        commit("c2", 2, &["c1"]).with_change(ChangeRecord::modified("a.txt")),
        commit("c3", 3, &["c1"]).with_change(ChangeRecord::modified("a.txt")),
        commit("c4", 4, &["c2", "c3"]).with_change(ChangeRecord::modified("a.txt")),
    ];
    let output = build(&commits);
    let mut found = predecessors(&output.document, &version("a.txt", "c4"));
    found.sort();
    let mut expected = vec![
        version("a.txt", "c2").as_str().to_string(),
        version("a.txt", "c3").as_str().to_string(),
    ];
    expected.sort();
    assert_eq!(found, expected);
    output.document.validate().unwrap();
}

#[test]
fn test_merge_with_one_touching_line() {
    let commits = vec![
        commit("c1", 1, &[]).with_change(ChangeRecord::added("a.txt")),
        commit("c2", 2, &["c1"]).with_change(ChangeRecord::modified("a.txt")),
        commit("c3", 3, &["c1"]).with_change(ChangeRecord::added("b.txt")),
        commit("c4", 4, &["c2", "c3"]).with_change(ChangeRecord::modified("a.txt")),
    ];
    let output = build(&commits);
    // c3's line reaches c1's version, which c2's line superseded; both are reported
    let found = predecessors(&output.document, &version("a.txt", "c4"));
    assert_eq!(found.len(), 2);
    assert!(found.contains(&version("a.txt", "c2").as_str().to_string()));
}

// === Renames and copies ===

#[test]
fn test_rename_derives_from_old_path() {
    let commits = vec![
        commit("c1", 1, &[]).with_change(ChangeRecord::added("old.txt")),
        commit("c2", 2, &["c1"]).with_change(ChangeRecord::renamed("old.txt", "new.txt")),
        commit("c3", 3, &["c2"]).with_change(ChangeRecord::modified("new.txt")),
    ];
    let output = build(&commits);
    let document = &output.document;
    assert!(output.warnings.is_empty());
    assert_eq!(
        predecessors(document, &version("new.txt", "c2")),
        vec![version("old.txt", "c1").as_str().to_string()]
    );
    assert_eq!(
        predecessors(document, &version("new.txt", "c3")),
        vec![version("new.txt", "c2").as_str().to_string()]
    );
    let renamed = document.entity(&version("new.txt", "c2")).unwrap();
    assert_eq!(renamed.attributes.text("old_path"), Some("old.txt"));
    assert_eq!(renamed.attributes.text("change"), Some("renamed"));
    assert_eq!(document.entities_of_type(EntityType::File).count(), 2);
}

#[test]
fn test_renamed_away_path_has_no_predecessor() {
    let commits = vec![
        commit("c1", 1, &[]).with_change(ChangeRecord::added("old.txt")),
        commit("c2", 2, &["c1"]).with_change(ChangeRecord::renamed("old.txt", "new.txt")),
        commit("c3", 3, &["c2"]).with_change(ChangeRecord::modified("old.txt")),
    ];
    let output = build(&commits);
    assert_eq!(
        output.warnings,
        vec![BuildWarning::UnresolvedDerivation {
            commit: "c3".to_string(),
            path: "old.txt".to_string(),
        }]
    );
}

#[test]
fn test_git_status_letters() {
    let commits = vec![
        commit("c1", 1, &[]).with_change(ChangeRecord::new("a.txt", "A")),
        commit("c2", 2, &["c1"]).with_change(ChangeRecord {
            old_path: Some("a.txt".to_string()),
            ..ChangeRecord::new("b.txt", "C075")
        }),
    ];
    let output = build(&commits);
    assert!(output.warnings.is_empty());
    assert_eq!(
        predecessors(&output.document, &version("b.txt", "c2")),
        vec![version("a.txt", "c1").as_str().to_string()]
    );
}

// === Agents ===

#[test]
fn test_author_and_committer() {
    let commits = vec![commit("c1", 1, &[])
        .with_committer(grace(), at(5))
        .with_change(ChangeRecord::added("a.txt"))];
    let output = build(&commits);
    let document = &output.document;
    assert_eq!(document.agents().count(), 2);

    let roles: Vec<_> = document
        .outgoing(RelationKind::WasAssociatedWith, &Activity::git_commit_id("c1"))
        .filter_map(|r| r.role)
        .collect();
    assert!(roles.contains(&ProvRole::Author));
    assert!(roles.contains(&ProvRole::Committer));

    let attributed: Vec<_> = document
        .outgoing(RelationKind::WasAttributedTo, &version("a.txt", "c1"))
        .map(|r| r.object.clone())
        .collect();
    assert_eq!(attributed, vec![common::ada().agent_id()]);

    let generation = document
        .outgoing(RelationKind::WasGeneratedBy, &version("a.txt", "c1"))
        .next()
        .unwrap();
    assert_eq!(generation.time, Some(at(5)));
}

#[test]
fn test_commit_title_recorded() {
    let commits = vec![commit("c1", 1, &[]).with_message("Fix parser\n\nLonger body")];
    let output = build(&commits);
    let activity = output
        .document
        .activity(&Activity::git_commit_id("c1"))
        .unwrap();
    assert_eq!(activity.attributes.text("title"), Some("Fix parser"));
}

// === Irregular input ===

#[test]
fn test_unknown_change_kind_is_skipped() {
    let commits = vec![commit("c1", 1, &[])
        .with_change(ChangeRecord::new("x.bin", "bogus"))
        .with_change(ChangeRecord::added("a.txt"))];
    let output = build(&commits);
    assert_eq!(output.warnings.len(), 1);
    assert!(matches!(
        &output.warnings[0],
        BuildWarning::UnknownChangeKind { tag, .. } if tag == "bogus"
    ));
    assert!(output.document.entity(&version("x.bin", "c1")).is_none());
    assert!(output.document.entity(&version("a.txt", "c1")).is_some());
}

#[test]
fn test_missing_parent_is_reported() {
    let commits = vec![commit("c2", 2, &["gone"]).with_change(ChangeRecord::added("b.txt"))];
    let output = build(&commits);
    assert_eq!(
        output.warnings,
        vec![BuildWarning::MissingParent {
            commit: "c2".to_string(),
            parent: "gone".to_string(),
        }]
    );
    assert_eq!(
        output
            .document
            .outgoing(RelationKind::WasInformedBy, &Activity::git_commit_id("c2"))
            .count(),
        0
    );
}

#[test]
fn test_unresolved_modification_is_built_as_addition() {
    let commits = vec![commit("c1", 1, &[]).with_change(ChangeRecord::modified("a.txt"))];
    let output = build(&commits);
    assert!(matches!(
        output.warnings.as_slice(),
        [BuildWarning::UnresolvedDerivation { .. }]
    ));
    let document = &output.document;
    let generation = document
        .outgoing(RelationKind::WasGeneratedBy, &version("a.txt", "c1"))
        .next()
        .unwrap();
    assert_eq!(generation.role, Some(ProvRole::FileVersionAtPointOfAddition));
    assert_eq!(
        document
            .entity(&version("a.txt", "c1"))
            .unwrap()
            .attributes
            .text("change"),
        Some("modified")
    );
    document.validate().unwrap();
}

#[test]
fn test_duplicate_commit_rejected() {
    let commits = vec![commit("c1", 1, &[]), commit("c1", 2, &[])];
    let result = CommitHistoryBuilder::new(PROJECT).build(&commits);
    assert!(matches!(result, Err(ProvError::DuplicateCommit { hash }) if hash == "c1"));
}

#[test]
fn test_commit_older_than_parent_rejected() {
    let commits = vec![
        commit("c1", 5, &[]).with_change(ChangeRecord::added("a.txt")),
        commit("c2", 1, &["c1"]).with_change(ChangeRecord::modified("a.txt")),
    ];
    let result = CommitHistoryBuilder::new(PROJECT).build(&commits);
    assert!(matches!(
        result,
        Err(ProvError::Model(ModelError::ModelViolation { id, .. })) if id == version("a.txt", "c2").as_str()
    ));
}

#[test]
fn test_empty_history() {
    let output = build(&[]);
    assert_eq!(output.document.stats().relations, 0);
    assert!(output.warnings.is_empty());
}
