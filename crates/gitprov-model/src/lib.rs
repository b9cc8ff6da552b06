//! gitprov-model - the provenance data model
//!
//! Typed building blocks for W3C PROV documents describing the history of a
//! hosted source-control project:
//!
//! - **Agent**: people and system actors, deduplicated by stable identifier
//! - **Entity**: files, file versions, platform resources and their versions,
//!   tags, releases
//! - **Activity**: git commits, resource creations and events
//! - **Relation**: PROV statements stored as identifier pairs
//! - **ProvDocument**: the statement store, which enforces relation legality
//!   and validates the versioning invariants
//!
//! # Versioning
//!
//! Nothing is mutated in place. Evolution is modelled as chains of versions:
//!
//! ```text
//! File ◄─specializationOf─ FileVersion ◄─wasDerivedFrom─ FileVersion
//! Resource ◄─specializationOf─ ResourceVersion ◄─wasDerivedFrom─ ResourceVersion
//! ```

pub mod agent;
pub mod attribute;
pub mod document;
pub mod element;
pub mod error;
pub mod event_kind;
pub mod id;
pub mod relation;

pub use agent::{Agent, AgentRole};
pub use attribute::{AttrValue, Attributes};
pub use document::{DocumentStats, ProvDocument, DEFAULT_NAMESPACE};
pub use element::{
    Activity, ActivityType, ElementCategory, Entity, EntityType, ResourceKind, VersionOrigin,
};
pub use error::{ModelError, Result};
pub use event_kind::EventKind;
pub use id::NodeId;
pub use relation::{ProvRole, Relation, RelationKind};
