//! gitprov-core - provenance construction engine
//!
//! Turns the history of a hosted source-control project into a
//! [`ProvDocument`](gitprov_model::ProvDocument):
//!
//! - **Commit history**: commits become activities, paths become files with
//!   one version per touching commit, linked by derivation across merges and
//!   renames
//! - **Resource history**: issues, merge requests and commit views become
//!   version chains, one version per classified event
//! - **Classification**: platform system notes are mapped onto a closed event
//!   vocabulary by an ordered rule table
//! - **Composition**: documents from separate runs are combined, duplicate
//!   agents merged and identities pseudonymized
//!
//! All operations are synchronous and pure: each consumes its inputs and
//! returns a complete new document. Recoverable input irregularities are
//! reported as [`BuildWarning`]s, never as errors.
//!
//! # Example
//!
//! ```ignore
//! use gitprov_core::{ProjectHistory, ProjectInput, ProvConfig};
//!
//! let config = ProvConfig::new().with_project("group/app");
//! let output = ProjectHistory::new(&config).build(&ProjectInput::default())?;
//! for warning in &output.warnings {
//!     eprintln!("{}", warning);
//! }
//! ```

pub mod classify;
pub mod commit;
pub mod compose;
pub mod config;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod resource;

pub use classify::{ClassifiedEvent, DiffPosition, EventClassifier, LabelAction, Rule};
pub use commit::{ChangeKind, ChangeRecord, CommitHistoryBuilder, CommitRecord};
pub use compose::{combine, merge_duplicate_agents, pseudonymize};
pub use config::{AgentAliases, AgentConfig, ProvConfig, PseudonymConfig};
pub use error::{BuildOutput, BuildWarning, ConfigError, ProvError, Result};
pub use identity::Identity;
pub use pipeline::{ProjectHistory, ProjectInput};
pub use resource::{
    Annotation, AnnotationBody, AssetRecord, CommitLink, EvidenceRecord, ReleaseHistoryBuilder,
    ReleaseRecord, ResourceHistoryBuilder, ResourceRecord, TagRecord,
};
