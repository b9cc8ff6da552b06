//! Entities and activities
//!
//! Entities are immutable snapshots (files, file versions, platform resources
//! and their versions, tags, releases); activities are the actions that
//! generate or use them (git commits, creations, events).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attribute::{AttrValue, Attributes};
use crate::event_kind::EventKind;
use crate::id::NodeId;

/// Broad category of a document element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementCategory {
    Agent,
    Entity,
    Activity,
}

impl std::fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementCategory::Agent => write!(f, "agent"),
            ElementCategory::Entity => write!(f, "entity"),
            ElementCategory::Activity => write!(f, "activity"),
        }
    }
}

/// Kind of platform resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Issue,
    MergeRequest,
    /// The platform's web view of a git commit
    Commit,
}

impl ResourceKind {
    /// Type name used in identifiers
    pub fn type_name(&self) -> &'static str {
        match self {
            ResourceKind::Issue => "Issue",
            ResourceKind::MergeRequest => "MergeRequest",
            ResourceKind::Commit => "CommitResource",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Issue => write!(f, "issue"),
            ResourceKind::MergeRequest => write!(f, "merge_request"),
            ResourceKind::Commit => write!(f, "commit"),
        }
    }
}

/// Type of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    File,
    FileVersion,
    Resource(ResourceKind),
    ResourceVersion(ResourceKind),
    Tag,
    Release,
    Asset,
    Evidence,
}

impl EntityType {
    /// Versions specialize exactly one root
    pub fn is_version(&self) -> bool {
        matches!(self, EntityType::FileVersion | EntityType::ResourceVersion(_))
    }

    /// Roots are the concepts versions specialize
    pub fn is_root(&self) -> bool {
        matches!(self, EntityType::File | EntityType::Resource(_))
    }

    /// Whether a version of this type may specialize the given root type
    pub fn specializes(&self, root: &EntityType) -> bool {
        match (self, root) {
            (EntityType::FileVersion, EntityType::File) => true,
            (EntityType::ResourceVersion(a), EntityType::Resource(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::File => write!(f, "File"),
            EntityType::FileVersion => write!(f, "FileVersion"),
            EntityType::Resource(kind) => write!(f, "{}", kind.type_name()),
            EntityType::ResourceVersion(kind) => write!(f, "{}Version", kind.type_name()),
            EntityType::Tag => write!(f, "Tag"),
            EntityType::Release => write!(f, "Release"),
            EntityType::Asset => write!(f, "Asset"),
            EntityType::Evidence => write!(f, "Evidence"),
        }
    }
}

/// Type of an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    GitCommit,
    Creation(ResourceKind),
    Event(EventKind),
    TagCreation,
    ReleaseCreation,
}

impl ActivityType {
    pub fn is_creation(&self) -> bool {
        matches!(self, ActivityType::Creation(_))
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityType::GitCommit => write!(f, "GitCommit"),
            ActivityType::Creation(kind) => write!(f, "{}Creation", kind.type_name()),
            ActivityType::Event(kind) => write!(f, "Event({})", kind),
            ActivityType::TagCreation => write!(f, "TagCreation"),
            ActivityType::ReleaseCreation => write!(f, "ReleaseCreation"),
        }
    }
}

/// An immutable entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: NodeId,
    pub entity_type: EntityType,
    pub attributes: Attributes,
}

impl Entity {
    pub fn new(id: NodeId, entity_type: EntityType) -> Self {
        Self {
            id,
            entity_type,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// The concept of a path across its whole history
    pub fn file(project: &str, path: &str) -> Self {
        Self::new(
            NodeId::compose("File", &[("project", project), ("path", path)]),
            EntityType::File,
        )
        .with_attribute("path", path)
    }

    /// One snapshot of a file as of one commit
    pub fn file_version(project: &str, path: &str, commit: &str, change: &str) -> Self {
        Self::new(
            Self::file_version_id(project, path, commit),
            EntityType::FileVersion,
        )
        .with_attribute("path", path)
        .with_attribute("commit", commit)
        .with_attribute("change", change)
    }

    pub fn file_version_id(project: &str, path: &str, commit: &str) -> NodeId {
        NodeId::compose(
            "FileVersion",
            &[("project", project), ("path", path), ("commit", commit)],
        )
    }

    /// The platform-side concept of an issue, merge request or commit view
    pub fn resource(kind: ResourceKind, project: &str, resource_id: &str) -> Self {
        Self::new(
            NodeId::compose(kind.type_name(), &[("project", project), ("id", resource_id)]),
            EntityType::Resource(kind),
        )
        .with_attribute("id", resource_id)
    }

    /// The state of a resource right after its creation
    pub fn first_resource_version(kind: ResourceKind, project: &str, resource_id: &str) -> Self {
        Self::new(
            NodeId::compose(
                &format!("{}Version", kind.type_name()),
                &[("project", project), ("id", resource_id)],
            ),
            EntityType::ResourceVersion(kind),
        )
    }

    /// The state of a resource right after one event
    pub fn event_resource_version(
        kind: ResourceKind,
        project: &str,
        resource_id: &str,
        event_id: &str,
    ) -> Self {
        Self::new(
            NodeId::compose(
                &format!("Annotated{}Version", kind.type_name()),
                &[("project", project), ("id", resource_id), ("event", event_id)],
            ),
            EntityType::ResourceVersion(kind),
        )
        .with_attribute("event", event_id)
    }

    pub fn tag(project: &str, name: &str) -> Self {
        Self::new(
            NodeId::compose("Tag", &[("project", project), ("name", name)]),
            EntityType::Tag,
        )
        .with_attribute("name", name)
    }

    pub fn release(project: &str, name: &str) -> Self {
        Self::new(
            NodeId::compose("Release", &[("project", project), ("name", name)]),
            EntityType::Release,
        )
        .with_attribute("name", name)
    }

    pub fn asset(url: &str, format: &str) -> Self {
        Self::new(
            NodeId::compose("Asset", &[("url", url), ("format", format)]),
            EntityType::Asset,
        )
        .with_attribute("url", url)
        .with_attribute("format", format)
    }

    pub fn evidence(hexsha: &str, url: &str, collected_at: DateTime<Utc>) -> Self {
        Self::new(
            NodeId::compose("Evidence", &[("hexsha", hexsha), ("url", url)]),
            EntityType::Evidence,
        )
        .with_attribute("url", url)
        .with_attribute("collected_at", collected_at)
    }

    /// Join another record with the same identifier into this one
    pub fn join(&mut self, other: &Entity) {
        self.attributes.join(&other.attributes);
    }
}

/// An activity with a start and end time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: NodeId,
    pub activity_type: ActivityType,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub attributes: Attributes,
}

impl Activity {
    pub fn new(
        id: NodeId,
        activity_type: ActivityType,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            activity_type,
            started_at,
            ended_at,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn git_commit_id(hexsha: &str) -> NodeId {
        NodeId::compose("GitCommit", &[("hexsha", hexsha)])
    }

    /// A git commit, spanning authoring to committing
    pub fn git_commit(hexsha: &str, authored_at: DateTime<Utc>, committed_at: DateTime<Utc>) -> Self {
        Self::new(
            Self::git_commit_id(hexsha),
            ActivityType::GitCommit,
            authored_at,
            committed_at,
        )
        .with_attribute("hexsha", hexsha)
    }

    /// The creation of a platform resource
    pub fn creation(
        kind: ResourceKind,
        project: &str,
        resource_id: &str,
        created_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            NodeId::compose(
                &format!("{}Creation", kind.type_name()),
                &[("project", project), ("id", resource_id)],
            ),
            ActivityType::Creation(kind),
            created_at,
            ended_at,
        )
    }

    /// One typed state change of a resource
    pub fn event(
        kind: EventKind,
        resource: &NodeId,
        event_id: &str,
        at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            NodeId::compose("Event", &[("resource", resource.as_str()), ("id", event_id)]),
            ActivityType::Event(kind),
            at,
            at,
        )
        .with_attribute("kind", kind.as_str())
        .with_attribute("id", event_id)
    }

    pub fn tag_creation(project: &str, name: &str, at: DateTime<Utc>) -> Self {
        Self::new(
            NodeId::compose("TagCreation", &[("project", project), ("name", name)]),
            ActivityType::TagCreation,
            at,
            at,
        )
    }

    pub fn release_creation(
        project: &str,
        name: &str,
        created_at: DateTime<Utc>,
        released_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            NodeId::compose("ReleaseCreation", &[("project", project), ("name", name)]),
            ActivityType::ReleaseCreation,
            created_at,
            released_at,
        )
    }

    /// Event kind, for event activities
    pub fn event_kind(&self) -> Option<EventKind> {
        match self.activity_type {
            ActivityType::Event(kind) => Some(kind),
            _ => None,
        }
    }

    /// Join another record with the same identifier into this one
    pub fn join(&mut self, other: &Activity) {
        self.started_at = self.started_at.min(other.started_at);
        self.ended_at = self.ended_at.max(other.ended_at);
        self.attributes.join(&other.attributes);
    }
}

/// Where a resource version comes from: exactly one of its creation or a
/// predecessor version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOrigin {
    /// First version, generated by the resource's creation activity
    Creation(NodeId),
    /// Later version, derived from the preceding version
    Predecessor(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_and_root_types() {
        assert!(EntityType::FileVersion.is_version());
        assert!(EntityType::File.is_root());
        assert!(EntityType::FileVersion.specializes(&EntityType::File));
        assert!(!EntityType::FileVersion.specializes(&EntityType::FileVersion));
        assert!(EntityType::ResourceVersion(ResourceKind::Issue)
            .specializes(&EntityType::Resource(ResourceKind::Issue)));
        assert!(!EntityType::ResourceVersion(ResourceKind::Issue)
            .specializes(&EntityType::Resource(ResourceKind::MergeRequest)));
    }

    #[test]
    fn test_identifiers_are_scoped() {
        let a = Entity::resource(ResourceKind::Issue, "group/app", "12");
        let b = Entity::resource(ResourceKind::MergeRequest, "group/app", "12");
        let c = Entity::resource(ResourceKind::Issue, "group/lib", "12");
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_eq!(a.id.prov_type(), "Issue");
    }

    #[test]
    fn test_activity_join_widens_interval() {
        let t0 = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let t1 = DateTime::parse_from_rfc3339("2024-01-02T00:00:00Z").unwrap().with_timezone(&Utc);
        let mut a = Activity::git_commit("abc", t1, t1);
        a.join(&Activity::git_commit("abc", t0, t0));
        assert_eq!(a.started_at, t0);
        assert_eq!(a.ended_at, t1);
    }
}
