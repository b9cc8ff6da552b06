//! Identities of people as delivered by the platform or by git

use gitprov_model::{Agent, AgentRole, NodeId};
use serde::{Deserialize, Serialize};

/// A person as seen in one input record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    /// Platform user id; preferred for identification because it survives renames
    pub platform_id: Option<String>,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            username: None,
            platform_id: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
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

    /// Stable agent identifier.
    ///
    /// Platform users are identified by their user id. Plain git identities
    /// have none and fall back to name and lower-cased email.
    pub fn agent_id(&self) -> NodeId {
        match &self.platform_id {
            Some(id) => NodeId::compose("User", &[("id", id)]),
            None => {
                let email = self.email.as_deref().unwrap_or_default().to_lowercase();
                NodeId::compose("User", &[("name", &self.name), ("email", &email)])
            }
        }
    }

    /// Agent record for this identity acting in the given role
    pub fn to_agent(&self, role: AgentRole) -> Agent {
        let mut agent = Agent::new(self.agent_id(), self.name.clone()).with_role(role);
        if let Some(email) = &self.email {
            agent = agent.with_email(email.clone());
        }
        if let Some(username) = &self.username {
            agent = agent.with_username(username.clone());
        }
        if let Some(platform_id) = &self.platform_id {
            agent = agent.with_platform_id(platform_id.clone());
        }
        agent
    }
}
