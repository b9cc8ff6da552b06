//! Resource, tag and release history integration tests

mod common;

use common::{ada, at, grace, PROJECT};
use gitprov_core::{
    Annotation, CommitLink, DiffPosition, LabelAction, ProvError, ReleaseHistoryBuilder, ReleaseRecord,
    ResourceHistoryBuilder, ResourceRecord, TagRecord,
};
use gitprov_model::{
    Activity, Entity, EventKind, ModelError, NodeId, ProvDocument, ProvRole, RelationKind,
    ResourceKind,
};

fn event_id(kind: ResourceKind, resource: &str, event: &str) -> NodeId {
    let resource = Entity::resource(kind, PROJECT, resource).id;
    Activity::event(EventKind::Unclassified, &resource, event, at(0)).id
}

fn issue_version(event: &str) -> NodeId {
    Entity::event_resource_version(ResourceKind::Issue, PROJECT, "100", event).id
}

fn triaged_issue() -> ResourceRecord {
    ResourceRecord::new(ResourceKind::Issue, "100", ada(), at(0))
        .with_iid("7")
        .with_title("Parser crashes on empty input")
        .closed_at(at(30))
        .with_annotation(Annotation::system_note("n1", grace(), at(5), "assigned to @grace"))
        .with_annotation(Annotation::label("n2", grace(), at(6), LabelAction::Add, "bug"))
        .with_annotation(Annotation::note("n3", ada(), at(10), "Looking into it"))
        .with_annotation(Annotation::award("n4", grace(), at(11), "thumbsup"))
        .with_annotation(Annotation::system_note("n5", ada(), at(30), "closed"))
}

fn build(records: &[ResourceRecord]) -> ProvDocument {
    ResourceHistoryBuilder::new(PROJECT)
        .build(records)
        .unwrap()
        .document
}

#[test]
fn test_issue_version_chain() {
    let document = build(&[triaged_issue()]);
    let first = Entity::first_resource_version(ResourceKind::Issue, PROJECT, "100").id;

    let mut expected_parent = first.clone();
    for event in ["n1", "n2", "n3", "n4", "n5"] {
        let parents: Vec<_> = document
            .outgoing(RelationKind::WasDerivedFrom, &issue_version(event))
            .map(|r| r.object.clone())
            .collect();
        assert_eq!(parents, vec![expected_parent.clone()], "parent of {}", event);
        expected_parent = issue_version(event);
    }
    assert!(document.is_first_version(&first));
    document.validate().unwrap();
}

#[test]
fn test_event_kinds() {
    let document = build(&[triaged_issue()]);
    let kind_of = |event: &str| {
        document
            .activity(&event_id(ResourceKind::Issue, "100", event))
            .and_then(|a| a.event_kind())
    };
    assert_eq!(kind_of("n1"), Some(EventKind::AssignUser));
    assert_eq!(kind_of("n2"), Some(EventKind::AddLabel));
    assert_eq!(kind_of("n3"), Some(EventKind::AddNote));
    assert_eq!(kind_of("n4"), Some(EventKind::AwardEmoji));
    assert_eq!(kind_of("n5"), Some(EventKind::Close));

    let assignment = document
        .activity(&event_id(ResourceKind::Issue, "100", "n1"))
        .unwrap();
    assert_eq!(assignment.attributes.text("user_name"), Some("grace"));
    let label = document
        .activity(&event_id(ResourceKind::Issue, "100", "n2"))
        .unwrap();
    assert_eq!(label.attributes.text("label"), Some("bug"));
}

#[test]
fn test_event_wiring() {
    let document = build(&[triaged_issue()]);
    let event = event_id(ResourceKind::Issue, "100", "n2");

    let used: Vec<_> = document.outgoing(RelationKind::Used, &event).collect();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].object, issue_version("n1"));
    assert_eq!(used[0].role, Some(ProvRole::ResourceVersionToBeAnnotated));

    let informed: Vec<_> = document
        .outgoing(RelationKind::WasInformedBy, &event)
        .map(|r| r.object.clone())
        .collect();
    assert_eq!(informed, vec![event_id(ResourceKind::Issue, "100", "n1")]);

    let initiator: Vec<_> = document
        .outgoing(RelationKind::WasAssociatedWith, &event)
        .collect();
    assert_eq!(initiator.len(), 1);
    assert_eq!(initiator[0].object, grace().agent_id());
    assert_eq!(initiator[0].role, Some(ProvRole::EventInitiator));

    let generation = document
        .outgoing(RelationKind::WasGeneratedBy, &issue_version("n2"))
        .next()
        .unwrap();
    assert_eq!(generation.object, event);
    assert_eq!(generation.time, Some(at(6)));
}

#[test]
fn test_first_event_informed_by_creation() {
    let document = build(&[triaged_issue()]);
    let creation = Activity::creation(ResourceKind::Issue, PROJECT, "100", at(0), at(30));
    let informed: Vec<_> = document
        .outgoing(
            RelationKind::WasInformedBy,
            &event_id(ResourceKind::Issue, "100", "n1"),
        )
        .map(|r| r.object.clone())
        .collect();
    assert_eq!(informed, vec![creation.id.clone()]);

    let recorded = document.activity(&creation.id).unwrap();
    assert_eq!(recorded.ended_at, at(30));
}

#[test]
fn test_resource_attributes_and_creator() {
    let document = build(&[triaged_issue()]);
    let issue = Entity::resource(ResourceKind::Issue, PROJECT, "100").id;
    let entity = document.entity(&issue).unwrap();
    assert_eq!(entity.attributes.text("iid"), Some("7"));
    assert_eq!(
        entity.attributes.text("title"),
        Some("Parser crashes on empty input")
    );
    let creators: Vec<_> = document
        .outgoing(RelationKind::WasAttributedTo, &issue)
        .map(|r| r.object.clone())
        .collect();
    assert_eq!(creators, vec![ada().agent_id()]);
}

#[test]
fn test_annotations_processed_in_time_order() {
    let record = ResourceRecord::new(ResourceKind::MergeRequest, "55", ada(), at(0))
        .with_annotation(Annotation::system_note(
            "late",
            ada(),
            at(20),
            "approved this merge request",
        ))
        .with_annotation(Annotation::system_note(
            "early",
            grace(),
            at(10),
            "requested review from @ada and @grace",
        ));
    let document = build(&[record]);
    let late = Entity::event_resource_version(ResourceKind::MergeRequest, PROJECT, "55", "late").id;
    let early =
        Entity::event_resource_version(ResourceKind::MergeRequest, PROJECT, "55", "early").id;
    let parents: Vec<_> = document
        .outgoing(RelationKind::WasDerivedFrom, &late)
        .map(|r| r.object.clone())
        .collect();
    assert_eq!(parents, vec![early]);

    let review = document
        .activity(&event_id(ResourceKind::MergeRequest, "55", "early"))
        .unwrap();
    assert_eq!(review.event_kind(), Some(EventKind::RequestReview));
    assert_eq!(review.attributes.text("user_name"), Some("ada"));
    assert_eq!(review.attributes.text("user_name2"), Some("grace"));
    document.validate().unwrap();
}

#[test]
fn test_diff_note_becomes_changed_lines_event() {
    let position = DiffPosition {
        position_type: "text".to_string(),
        base_sha: "9f0e1d".to_string(),
        start_sha: "9f0e1d".to_string(),
        head_sha: "4f2a9c".to_string(),
        old_path: "src/lib.rs".to_string(),
        new_path: "src/lib.rs".to_string(),
        old_line: Some(12),
        new_line: Some(14),
    };
    let record = ResourceRecord::new(ResourceKind::MergeRequest, "55", ada(), at(0))
        .with_annotation(Annotation::diff_note(
            "d1",
            grace(),
            at(3),
            "Should this be `Option<u32>`?",
            position,
        ));
    let document = build(&[record]);
    let event = document
        .activity(&event_id(ResourceKind::MergeRequest, "55", "d1"))
        .unwrap();
    assert_eq!(event.event_kind(), Some(EventKind::ChangedLines));
    assert_eq!(event.attributes.text("body"), Some("Should this be `Option<u32>`?"));
    assert_eq!(event.attributes.text("position_old_line"), Some("12"));
    assert_eq!(event.attributes.text("position_new_line"), Some("14"));
    assert_eq!(event.attributes.text("position_head_sha"), Some("4f2a9c"));
}

#[test]
fn test_annotation_before_creation_rejected() {
    let record = ResourceRecord::new(ResourceKind::Issue, "100", ada(), at(10))
        .with_annotation(Annotation::system_note("n1", ada(), at(5), "closed"));
    let result = ResourceHistoryBuilder::new(PROJECT).build(&[record]);
    match result {
        Err(ProvError::Model(ModelError::ModelViolation { id, .. })) => {
            assert_eq!(id, issue_version("n1").as_str());
        }
        other => panic!("expected a model violation, got {:?}", other),
    }
}

#[test]
fn test_unclassified_note_keeps_raw_text() {
    let record = ResourceRecord::new(ResourceKind::Issue, "100", ada(), at(0)).with_annotation(
        Annotation::system_note("n1", ada(), at(1), "Did Something Unheard Of"),
    );
    let document = build(&[record]);
    let event = document
        .activity(&event_id(ResourceKind::Issue, "100", "n1"))
        .unwrap();
    assert_eq!(event.event_kind(), Some(EventKind::Unclassified));
    assert_eq!(event.attributes.text("raw"), Some("Did Something Unheard Of"));
}

#[test]
fn test_commit_resource() {
    let record = ResourceRecord::new(ResourceKind::Commit, "4f2a9c1e", ada(), at(3))
        .with_commit(CommitLink {
            hash: "4f2a9c1e".to_string(),
            committer: grace(),
            authored_at: at(1),
            committed_at: at(2),
        })
        .with_annotation(Annotation::new(
            "c1",
            grace(),
            at(4),
            gitprov_core::AnnotationBody::Comment {
                body: "nice".to_string(),
            },
        ));
    let document = build(&[record]);
    let creation = Activity::creation(ResourceKind::Commit, PROJECT, "4f2a9c1e", at(3), at(3)).id;
    let informed: Vec<_> = document
        .outgoing(RelationKind::WasInformedBy, &creation)
        .map(|r| r.object.clone())
        .collect();
    assert_eq!(informed, vec![Activity::git_commit_id("4f2a9c1e")]);

    let comment = document
        .activity(&event_id(ResourceKind::Commit, "4f2a9c1e", "c1"))
        .unwrap();
    assert_eq!(comment.event_kind(), Some(EventKind::AddComment));
    document.validate().unwrap();
}

// === Tags and releases ===

fn tag() -> TagRecord {
    TagRecord {
        name: "v1.0".to_string(),
        hash: "4f2a9c1e".to_string(),
        message: Some("First release".to_string()),
        author: ada(),
        created_at: at(40),
    }
}

#[test]
fn test_release_membership_chain() {
    let release = ReleaseRecord::new("1.0", at(45))
        .with_tag("v1.0")
        .with_author(grace())
        .with_asset("https://example.org/app-1.0.tar.gz", "tar.gz");
    let output = ReleaseHistoryBuilder::new(PROJECT)
        .build(&[tag()], &[release])
        .unwrap();
    let document = &output.document;

    let commit = Entity::resource(ResourceKind::Commit, PROJECT, "4f2a9c1e").id;
    let tag_id = Entity::tag(PROJECT, "v1.0").id;
    let release_id = Entity::release(PROJECT, "1.0").id;
    let asset = Entity::asset("https://example.org/app-1.0.tar.gz", "tar.gz").id;

    let members = |id: &NodeId| {
        document
            .outgoing(RelationKind::HadMember, id)
            .map(|r| r.object.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(members(&commit), vec![tag_id.clone()]);
    assert_eq!(members(&tag_id), vec![release_id.clone()]);
    assert_eq!(members(&release_id), vec![asset]);

    let authors: Vec<_> = document
        .outgoing(RelationKind::WasAttributedTo, &release_id)
        .map(|r| r.object.clone())
        .collect();
    assert_eq!(authors, vec![grace().agent_id()]);
}

#[test]
fn test_release_without_known_tag() {
    let release = ReleaseRecord::new("2.0", at(50)).with_tag("v2.0");
    let output = ReleaseHistoryBuilder::new(PROJECT)
        .build(&[], &[release])
        .unwrap();
    let release_id = Entity::release(PROJECT, "2.0").id;
    assert!(output.document.entity(&release_id).is_some());
    assert_eq!(
        output
            .document
            .incoming(RelationKind::HadMember, &release_id)
            .count(),
        0
    );
}
