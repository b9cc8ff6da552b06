//! Document composition integration tests
//!
//! Property-based checks of combine, agent merging and pseudonymization over
//! generated commit histories.

mod common;

use common::{ada, ada_at_home, ada_renamed, at, grace, PROJECT};
use gitprov_core::{
    combine, merge_duplicate_agents, pseudonymize, AgentAliases, ChangeRecord,
    CommitHistoryBuilder, CommitRecord,
};
use gitprov_model::{ProvDocument, RelationKind};
use proptest::prelude::*;

const PATHS: [&str; 3] = ["README.md", "src/lib.rs", "src/main.rs"];
const TAGS: [&str; 3] = ["added", "modified", "deleted"];

/// Linear history of up to five commits with hashes `<prefix>0`, `<prefix>1`, ...
///
/// Authors include Ada under two profiles of the same platform account, so
/// one agent id shows up with different display data across histories.
fn history(prefix: &'static str) -> impl Strategy<Value = Vec<CommitRecord>> {
    prop::collection::vec(
        (
            0usize..4,
            prop::collection::btree_map(0usize..PATHS.len(), 0usize..TAGS.len(), 0..3),
        ),
        1..6,
    )
    .prop_map(move |steps| {
        let people = [ada(), grace(), ada_at_home(), ada_renamed()];
        let mut commits = Vec::with_capacity(steps.len());
        for (i, (author, changes)) in steps.into_iter().enumerate() {
            let mut record =
                CommitRecord::new(format!("{}{}", prefix, i), people[author].clone(), at(i as i64));
            if i > 0 {
                record = record.with_parent(format!("{}{}", prefix, i - 1));
            }
            for (path, tag) in changes {
                record = record.with_change(ChangeRecord::new(PATHS[path], TAGS[tag]));
            }
            commits.push(record);
        }
        commits
    })
}

fn build(commits: &[CommitRecord]) -> ProvDocument {
    CommitHistoryBuilder::new(PROJECT)
        .build(commits)
        .unwrap()
        .document
}

fn aliases() -> AgentAliases {
    AgentAliases::new()
        .with_alias("Ada", "17")
        .with_alias("Ada", "ada@home.example")
}

/// Mapping that names only a display name of the platform account
fn display_name_aliases() -> AgentAliases {
    AgentAliases::new().with_alias("Ada", "Ada Lovelace")
}

// === Combine ===

#[test]
fn test_combine_nothing_is_empty() {
    let combined = combine(std::iter::empty::<&ProvDocument>()).unwrap();
    assert_eq!(combined, ProvDocument::default());
}

#[test]
fn test_combine_single_document() {
    let document = build(&[CommitRecord::new("c1", ada(), at(1))
        .with_change(ChangeRecord::added("README.md"))]);
    assert_eq!(combine([&document]).unwrap(), document);
}

#[test]
fn test_combine_merges_shared_agents() {
    let first = build(&[CommitRecord::new("a1", ada(), at(1))]);
    let second = build(&[CommitRecord::new("b1", ada(), at(2))
        .with_committer(grace(), at(3))]);
    let combined = combine([&first, &second]).unwrap();
    assert_eq!(combined.agents().count(), 2);
    assert_eq!(combined.activities().count(), 2);
}

// === Merge ===

#[test]
fn test_merge_collapses_git_and_platform_identities() {
    let document = build(&[
        CommitRecord::new("c1", ada(), at(1)).with_change(ChangeRecord::added("README.md")),
        CommitRecord::new("c2", ada_at_home(), at(2))
            .with_parent("c1")
            .with_change(ChangeRecord::modified("README.md")),
    ]);
    assert_eq!(document.agents().count(), 2);

    let merged = merge_duplicate_agents(&document, &aliases()).unwrap();
    assert_eq!(merged.agents().count(), 1);
    let canonical = AgentAliases::canonical_id("Ada");
    assert_eq!(
        merged
            .incoming(RelationKind::WasAttributedTo, &canonical)
            .count(),
        2
    );
    merged.validate().unwrap();
}

#[test]
fn test_merge_commutes_across_profile_changes() {
    let first = build(&[CommitRecord::new("a1", ada(), at(1))]);
    let second = build(&[CommitRecord::new("b1", ada_renamed(), at(2))]);
    for mapping in [aliases(), display_name_aliases()] {
        let merged_after = merge_duplicate_agents(&combine([&first, &second]).unwrap(), &mapping).unwrap();
        let merged_before = combine([
            &merge_duplicate_agents(&first, &mapping).unwrap(),
            &merge_duplicate_agents(&second, &mapping).unwrap(),
        ])
        .unwrap();
        assert_eq!(merged_after, merged_before);
        assert_eq!(merged_after.agents().count(), 1);
    }

    let combined = combine([&first, &second]).unwrap();
    let ada = combined.agent(&ada().agent_id()).unwrap();
    assert_eq!(ada.name, "A. Lovelace");
    assert!(ada.external_identifiers().contains("Ada Lovelace"));
    assert!(ada.external_identifiers().contains("ada@example.org"));
}

// === Pseudonymization ===

#[test]
fn test_pseudonyms_are_stable_across_runs() {
    let first = build(&[CommitRecord::new("a1", ada(), at(1))]);
    let second = build(&[CommitRecord::new("b1", ada(), at(2))]);
    let combined = combine([
        &pseudonymize(&first, "salt").unwrap(),
        &pseudonymize(&second, "salt").unwrap(),
    ])
    .unwrap();
    assert_eq!(combined.agents().count(), 1);
}

#[test]
fn test_salt_changes_pseudonyms() {
    let document = build(&[CommitRecord::new("c1", ada(), at(1))]);
    let one = pseudonymize(&document, "one").unwrap();
    let two = pseudonymize(&document, "two").unwrap();
    let id_one = one.agents().next().map(|a| a.id.clone());
    let id_two = two.agents().next().map(|a| a.id.clone());
    assert_ne!(id_one, id_two);
}

proptest! {
    #[test]
    fn test_combine_is_idempotent(commits in history("c")) {
        let document = build(&commits);
        prop_assert_eq!(combine([&document, &document]).unwrap(), document);
    }

    #[test]
    fn test_combine_is_order_independent(a in history("a"), b in history("b")) {
        let a = build(&a);
        let b = build(&b);
        prop_assert_eq!(combine([&a, &b]).unwrap(), combine([&b, &a]).unwrap());
    }

    #[test]
    fn test_combine_is_associative(a in history("a"), b in history("b"), c in history("c")) {
        let (a, b, c) = (build(&a), build(&b), build(&c));
        let left = combine([&combine([&a, &b]).unwrap(), &c]).unwrap();
        let right = combine([&a, &combine([&b, &c]).unwrap()]).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn test_merge_is_idempotent(commits in history("c")) {
        let once = merge_duplicate_agents(&build(&commits), &aliases()).unwrap();
        let twice = merge_duplicate_agents(&once, &aliases()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_commutes_with_combine(
        a in history("a"),
        b in history("b"),
        by_display_name in any::<bool>(),
    ) {
        let (a, b) = (build(&a), build(&b));
        let mapping = if by_display_name { display_name_aliases() } else { aliases() };
        let merged_after = merge_duplicate_agents(&combine([&a, &b]).unwrap(), &mapping).unwrap();
        let merged_before = combine([
            &merge_duplicate_agents(&a, &mapping).unwrap(),
            &merge_duplicate_agents(&b, &mapping).unwrap(),
        ])
        .unwrap();
        prop_assert_eq!(merged_after, merged_before);
    }

    #[test]
    fn test_pseudonymize_is_deterministic(commits in history("c"), salt in "[a-z0-9]{0,12}") {
        let document = build(&commits);
        prop_assert_eq!(
            pseudonymize(&document, &salt).unwrap(),
            pseudonymize(&document, &salt).unwrap()
        );
    }

    #[test]
    fn test_pseudonymize_preserves_shape(commits in history("c"), salt in "[a-z0-9]{0,12}") {
        let document = build(&commits);
        let pseudonymized = pseudonymize(&document, &salt).unwrap();
        let (before, after) = (document.stats(), pseudonymized.stats());
        prop_assert_eq!(before.agents, after.agents);
        prop_assert_eq!(before.entities, after.entities);
        prop_assert_eq!(before.activities, after.activities);
        prop_assert_eq!(before.relations, after.relations);
        for agent in pseudonymized.agents() {
            prop_assert!(agent.id.as_str().starts_with("User?pseudonym="));
            prop_assert!(agent.platform_id.is_none());
        }
    }
}
