//! PROV relations between elements
//!
//! Relations are stored as identifier pairs rather than live references, so a
//! document is a plain arena of elements plus a set of statements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::element::ElementCategory;
use crate::id::NodeId;

/// Kind of a PROV relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    SpecializationOf,
    WasDerivedFrom,
    WasGeneratedBy,
    Used,
    WasInvalidatedBy,
    WasInformedBy,
    WasAssociatedWith,
    WasAttributedTo,
    HadMember,
}

impl RelationKind {
    /// The (subject, object) categories the relation connects
    pub fn endpoints(&self) -> (ElementCategory, ElementCategory) {
        use ElementCategory::*;
        match self {
            RelationKind::SpecializationOf => (Entity, Entity),
            RelationKind::WasDerivedFrom => (Entity, Entity),
            RelationKind::WasGeneratedBy => (Entity, Activity),
            RelationKind::Used => (Activity, Entity),
            RelationKind::WasInvalidatedBy => (Entity, Activity),
            RelationKind::WasInformedBy => (Activity, Activity),
            RelationKind::WasAssociatedWith => (Activity, Agent),
            RelationKind::WasAttributedTo => (Entity, Agent),
            RelationKind::HadMember => (Entity, Entity),
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::SpecializationOf => write!(f, "specializationOf"),
            RelationKind::WasDerivedFrom => write!(f, "wasDerivedFrom"),
            RelationKind::WasGeneratedBy => write!(f, "wasGeneratedBy"),
            RelationKind::Used => write!(f, "used"),
            RelationKind::WasInvalidatedBy => write!(f, "wasInvalidatedBy"),
            RelationKind::WasInformedBy => write!(f, "wasInformedBy"),
            RelationKind::WasAssociatedWith => write!(f, "wasAssociatedWith"),
            RelationKind::WasAttributedTo => write!(f, "wasAttributedTo"),
            RelationKind::HadMember => write!(f, "hadMember"),
        }
    }
}

/// Role qualifying a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProvRole {
    Author,
    Committer,
    Creator,
    EventInitiator,
    TagAuthor,
    ReleaseAuthor,
    File,
    FileVersionAtPointOfAddition,
    FileVersionAfterModification,
    FileVersionToBeModified,
    FileVersionAtPointOfDeletion,
    Resource,
    ResourceVersionAtPointOfCreation,
    ResourceVersionToBeAnnotated,
    ResourceVersionAfterAnnotation,
    Tag,
    Release,
}

impl std::fmt::Display for ProvRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProvRole::Author => "Author",
            ProvRole::Committer => "Committer",
            ProvRole::Creator => "Creator",
            ProvRole::EventInitiator => "EventInitiator",
            ProvRole::TagAuthor => "TagAuthor",
            ProvRole::ReleaseAuthor => "ReleaseAuthor",
            ProvRole::File => "File",
            ProvRole::FileVersionAtPointOfAddition => "FileVersionAtPointOfAddition",
            ProvRole::FileVersionAfterModification => "FileVersionAfterModification",
            ProvRole::FileVersionToBeModified => "FileVersionToBeModified",
            ProvRole::FileVersionAtPointOfDeletion => "FileVersionAtPointOfDeletion",
            ProvRole::Resource => "Resource",
            ProvRole::ResourceVersionAtPointOfCreation => "ResourceVersionAtPointOfCreation",
            ProvRole::ResourceVersionToBeAnnotated => "ResourceVersionToBeAnnotated",
            ProvRole::ResourceVersionAfterAnnotation => "ResourceVersionAfterAnnotation",
            ProvRole::Tag => "Tag",
            ProvRole::Release => "Release",
        };
        write!(f, "{}", name)
    }
}

/// One relation statement
///
/// Field order defines the statement ordering: kind, then subject, then
/// object. Documents rely on this to range-scan the outgoing relations of a
/// subject.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationKind,
    pub subject: NodeId,
    pub object: NodeId,
    pub time: Option<DateTime<Utc>>,
    pub role: Option<ProvRole>,
}

impl Relation {
    pub fn new(kind: RelationKind, subject: NodeId, object: NodeId) -> Self {
        Self {
            kind,
            subject,
            object,
            time: None,
            role: None,
        }
    }

    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_role(mut self, role: ProvRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Smallest relation of the given kind and subject, used as a range bound
    pub(crate) fn lower_bound(kind: RelationKind, subject: &NodeId) -> Self {
        Self::new(kind, subject.clone(), NodeId::from_raw(String::new()))
    }

    /// Copy of this relation with both endpoints passed through `map`
    pub fn rewrite(&self, map: impl Fn(&NodeId) -> NodeId) -> Self {
        Self {
            kind: self.kind,
            subject: map(&self.subject),
            object: map(&self.object),
            time: self.time,
            role: self.role,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", self.kind, self.subject, self.object)
    }
}
