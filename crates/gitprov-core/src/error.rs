//! Error and warning types for gitprov-core
//!
//! Fatal conditions abort the current build and surface as [`ProvError`].
//! Conditions the builders recover from locally are collected as
//! [`BuildWarning`]s next to the produced document.

use gitprov_model::{ModelError, ProvDocument, ResourceKind};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for gitprov operations
pub type Result<T> = std::result::Result<T, ProvError>;

/// Main error type for gitprov operations
#[derive(Error, Debug)]
pub enum ProvError {
    /// A statement would break a model invariant
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Two commit records share a hash
    #[error("Duplicate commit: {hash}")]
    DuplicateCommit { hash: String },

    /// Two resource records share a kind and id
    #[error("Duplicate {kind} resource: {id}")]
    DuplicateResource { kind: ResourceKind, id: String },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// TOML or JSON parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Semantically invalid value
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// A recoverable irregularity in the input data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BuildWarning {
    /// A change record carried a tag the builder does not know; it was skipped
    UnknownChangeKind {
        commit: String,
        path: String,
        tag: String,
    },
    /// A modified path had no predecessor on any parent line; it was built as
    /// an addition
    UnresolvedDerivation { commit: String, path: String },
    /// A parent hash is not part of the input (shallow history)
    MissingParent { commit: String, parent: String },
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildWarning::UnknownChangeKind { commit, path, tag } => write!(
                f,
                "commit {}: ignored change of {} with unknown kind {:?}",
                commit, path, tag
            ),
            BuildWarning::UnresolvedDerivation { commit, path } => write!(
                f,
                "commit {}: no predecessor for {}, treated as added",
                commit, path
            ),
            BuildWarning::MissingParent { commit, parent } => {
                write!(f, "commit {}: parent {} is not in the input", commit, parent)
            }
        }
    }
}

/// A built document together with the warnings recorded while building it
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub document: ProvDocument,
    pub warnings: Vec<BuildWarning>,
}

impl BuildOutput {
    pub fn new(document: ProvDocument) -> Self {
        Self {
            document,
            warnings: Vec::new(),
        }
    }

    /// Record a warning and log it
    pub(crate) fn warn(&mut self, warning: BuildWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}
