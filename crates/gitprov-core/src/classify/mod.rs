//! Event classification
//!
//! Platform notes are free text. The classifier maps them onto the closed
//! [`EventKind`] vocabulary with extracted parameters; label and award records
//! arrive structured and map directly.

pub mod classifier;
pub mod rules;
pub mod structured;

use std::collections::BTreeMap;

use gitprov_model::EventKind;
use serde::{Deserialize, Serialize};

pub use classifier::EventClassifier;
pub use rules::Rule;
pub use structured::{DiffPosition, LabelAction};

/// A typed event with its extracted parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    pub kind: EventKind,
    pub attributes: BTreeMap<String, String>,
}

impl ClassifiedEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn is_unclassified(&self) -> bool {
        self.kind == EventKind::Unclassified
    }
}
