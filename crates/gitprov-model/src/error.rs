//! Error types for gitprov-model

use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised when a statement would break the provenance model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// An attempted link or record breaks a model invariant
    #[error("Model violation at {id}: {reason}")]
    ModelViolation { id: String, reason: String },

    /// A relation references an element that is not in the document
    #[error("Dangling reference in {relation}: {id} is not in the document")]
    DanglingReference { relation: String, id: String },

    /// A relation connects element categories it does not allow
    #[error("Illegal relation {relation} from {subject} to {object}")]
    IllegalRelation {
        relation: String,
        subject: String,
        object: String,
    },
}

impl ModelError {
    /// Shorthand for an invariant violation on the given element
    pub fn violation(id: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        ModelError::ModelViolation {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
