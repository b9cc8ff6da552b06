//! Agents: people or system actors responsible for activities

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// Role tag an agent has been seen in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    Author,
    Committer,
    /// Creator of an issue, merge request or commit resource
    Creator,
    /// Initiator of an event on a resource
    EventInitiator,
    TagAuthor,
    ReleaseAuthor,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::Author => write!(f, "Author"),
            AgentRole::Committer => write!(f, "Committer"),
            AgentRole::Creator => write!(f, "Creator"),
            AgentRole::EventInitiator => write!(f, "EventInitiator"),
            AgentRole::TagAuthor => write!(f, "TagAuthor"),
            AgentRole::ReleaseAuthor => write!(f, "ReleaseAuthor"),
        }
    }
}

/// A responsible actor in the provenance graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Stable identifier
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Lower-cased email address
    pub email: Option<String>,
    /// Platform username
    pub username: Option<String>,
    /// Platform-provided user id
    pub platform_id: Option<String>,
    /// Roles this agent was seen in
    pub roles: BTreeSet<AgentRole>,
    /// Other identifiers this agent is known by: values displaced by joins
    /// and identifiers collapsed into it by alias resolution
    pub aliases: BTreeSet<String>,
}

impl Agent {
    /// Create a new agent
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            username: None,
            platform_id: None,
            roles: BTreeSet::new(),
            aliases: BTreeSet::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into().to_lowercase());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_platform_id(mut self, platform_id: impl Into<String>) -> Self {
        self.platform_id = Some(platform_id.into());
        self
    }

    pub fn with_role(mut self, role: AgentRole) -> Self {
        self.roles.insert(role);
        self
    }

    /// Every external identifier this agent can be recognized by
    pub fn external_identifiers(&self) -> BTreeSet<String> {
        let mut ids: BTreeSet<String> = self.aliases.clone();
        ids.insert(self.name.clone());
        ids.extend(self.email.iter().cloned());
        ids.extend(self.username.iter().cloned());
        ids.extend(self.platform_id.iter().cloned());
        ids
    }

    /// Join a record of the same agent into this one.
    ///
    /// Sets are unioned and conflicting scalars resolve to the smaller value;
    /// the displaced value is kept as an alias so no identifier is lost.
    /// Joining is commutative, associative and idempotent.
    pub fn join(&mut self, other: &Agent) {
        if other.name != self.name {
            self.aliases.insert(self.name.clone().max(other.name.clone()));
            if other.name < self.name {
                self.name = other.name.clone();
            }
        }
        join_option(&mut self.email, &other.email, &mut self.aliases);
        join_option(&mut self.username, &other.username, &mut self.aliases);
        join_option(&mut self.platform_id, &other.platform_id, &mut self.aliases);
        self.roles.extend(other.roles.iter().copied());
        self.aliases.extend(other.aliases.iter().cloned());
    }
}

fn join_option(slot: &mut Option<String>, other: &Option<String>, aliases: &mut BTreeSet<String>) {
    match (slot.as_ref(), other) {
        (None, Some(value)) => *slot = Some(value.clone()),
        (Some(current), Some(value)) if value != current => {
            aliases.insert(current.max(value).clone());
            if value < current {
                *slot = Some(value.clone());
            }
        }
        _ => {}
    }
}
