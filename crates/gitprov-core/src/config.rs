//! Configuration for gitprov-core
//!
//! Run parameters for one extraction: the identifier namespace, the project
//! being described, pseudonymization settings and the operator-supplied
//! agent alias mapping.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use gitprov_model::{Agent, NodeId, DEFAULT_NAMESPACE};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvConfig {
    /// Namespace recorded on every produced document
    pub namespace: String,
    /// Project identifier used to scope files and resources
    pub project: String,
    /// Pseudonymization settings
    pub pseudonymize: PseudonymConfig,
    /// Agent deduplication settings
    pub agents: AgentConfig,
}

impl Default for ProvConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            project: "default".to_string(),
            pseudonymize: PseudonymConfig::default(),
            agents: AgentConfig::default(),
        }
    }
}

/// Pseudonymization settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PseudonymConfig {
    pub enabled: bool,
    /// Mixed into every digest; runs that must produce mergeable output share it
    pub salt: String,
}

/// Agent deduplication settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub aliases: AgentAliases,
}

impl ProvConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&text)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "namespace".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.project.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "project".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        self.agents.aliases.validate()
    }
}

/// Operator-asserted mapping from a canonical name to the external
/// identifiers (names, emails, usernames, platform ids) it stands for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentAliases(BTreeMap<String, Vec<String>>);

impl AgentAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, canonical: impl Into<String>, alias: impl Into<String>) -> Self {
        self.0.entry(canonical.into()).or_default().push(alias.into());
        self
    }

    /// Parse the JSON mapping format `{"canonical": ["alias", ...]}`
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let aliases: Self = serde_json::from_str(json_str)?;
        aliases.validate()?;
        Ok(aliases)
    }

    /// Load a JSON mapping file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Reject aliases claimed by more than one canonical name
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut owner: BTreeMap<&str, &str> = BTreeMap::new();
        for (canonical, aliases) in &self.0 {
            for alias in aliases {
                if let Some(previous) = owner.insert(alias.as_str(), canonical.as_str()) {
                    if previous != canonical.as_str() {
                        return Err(ConfigError::Invalid {
                            field: format!("agents.aliases.{}", alias),
                            reason: format!("claimed by both {} and {}", previous, canonical),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Canonical name an external identifier belongs to
    pub fn canonical_of(&self, identifier: &str) -> Option<&str> {
        self.0.iter().find_map(|(canonical, aliases)| {
            if canonical == identifier || aliases.iter().any(|a| a == identifier) {
                Some(canonical.as_str())
            } else {
                None
            }
        })
    }

    /// Canonical name for an agent, matched on the identifiers its id is
    /// built from: the platform user id, or name and email of a plain git
    /// identity.
    ///
    /// Display names and emails of platform users are not matched. An agent
    /// that already carries a canonical identifier keeps it. Identifiers are
    /// tried in sorted order.
    pub fn canonical_for(&self, agent: &Agent) -> Option<&str> {
        if let Some(canonical) = agent.id.attribute("canonical") {
            if let Some((name, _)) = self.0.get_key_value(&canonical) {
                return Some(name.as_str());
            }
        }
        ["id", "name", "email"]
            .iter()
            .filter_map(|key| agent.id.attribute(key))
            .collect::<BTreeSet<_>>()
            .iter()
            .find_map(|identifier| self.canonical_of(identifier))
    }

    /// Agent identifier of a canonical name
    pub fn canonical_id(canonical: &str) -> NodeId {
        NodeId::compose("User", &[("canonical", canonical)])
    }
}
