use std::collections::HashMap;

use gitprov_model::{Agent, NodeId, ProvDocument};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Event attributes that name people
const PERSONAL_ATTRIBUTES: &[&str] = &["user_name", "user_name2", "pre_import_author"];

/// Salted SHA-256 of a value, hex encoded
fn digest(salt: &str, value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update([0u8]);
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Replace every agent's identifier and identifying data with salted
/// digests.
///
/// Pseudonyms derive from the agent identifier, so the same person gets the
/// same pseudonym in every run that uses the same salt and the outputs can
/// still be combined. Distinct agents stay distinct. Platform ids and
/// remembered aliases are dropped; personal names captured from notes are
/// hashed too.
pub fn pseudonymize(document: &ProvDocument, salt: &str) -> Result<ProvDocument> {
    let mut pseudonymized = ProvDocument::new(document.namespace());
    let mut reroute: HashMap<NodeId, NodeId> = HashMap::new();

    for agent in document.agents() {
        let id = NodeId::compose("User", &[("pseudonym", &digest(salt, agent.id.as_str()))]);
        let mut pseudonym = Agent::new(id.clone(), digest(salt, &agent.name));
        pseudonym.email = agent.email.as_deref().map(|email| digest(salt, email));
        pseudonym.username = agent.username.as_deref().map(|name| digest(salt, name));
        pseudonym.roles = agent.roles.clone();
        reroute.insert(agent.id.clone(), id);
        pseudonymized.add_agent(pseudonym)?;
    }

    for entity in document.entities() {
        pseudonymized.add_entity(entity.clone())?;
    }
    for activity in document.activities() {
        let mut activity = activity.clone();
        for key in PERSONAL_ATTRIBUTES {
            let hashed = activity.attributes.text(key).map(|value| digest(salt, value));
            if let Some(hashed) = hashed {
                activity.attributes.insert(*key, hashed);
            }
        }
        pseudonymized.add_activity(activity)?;
    }
    for relation in document.relations() {
        pseudonymized
            .relate(relation.rewrite(|id| reroute.get(id).cloned().unwrap_or_else(|| id.clone())))?;
    }

    tracing::info!("Pseudonymized {} agents", reroute.len());
    Ok(pseudonymized)
}
