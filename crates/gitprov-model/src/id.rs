//! Stable identifiers for provenance elements
//!
//! Identifiers are deterministic functions of the record they describe, written
//! as `<ProvType>?<key>=<value>&...` with URL-encoded values. Two extraction
//! runs over the same data therefore agree on every identifier.

use serde::{Deserialize, Serialize};

/// Identifier of an agent, entity or activity in a document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Compose an identifier from a type name and ordered key/value pairs
    pub fn compose(prov_type: &str, attrs: &[(&str, &str)]) -> Self {
        if attrs.is_empty() {
            return Self(prov_type.to_string());
        }
        let query = attrs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        Self(format!("{}?{}", prov_type, query))
    }

    /// Wrap an already composed identifier
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The type name part of the identifier (before `?`)
    pub fn prov_type(&self) -> &str {
        self.0.split('?').next().unwrap_or_default()
    }

    /// Look up a decoded attribute from the query part
    pub fn attribute(&self, key: &str) -> Option<String> {
        let (_, query) = self.0.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| urlencoding::decode(v).ok())
            .map(|v| v.into_owned())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
