use std::collections::HashMap;

use gitprov_model::{NodeId, ProvDocument};

use crate::config::AgentAliases;
use crate::error::Result;

/// Collapse agents the alias mapping declares to be one person.
///
/// Every matched agent is re-identified as `User?canonical=<name>`, takes the
/// canonical name, and remembers the identifiers it was matched on. Relations
/// are rerouted to the canonical agent and duplicates collapse. Applying the
/// same mapping again changes nothing.
pub fn merge_duplicate_agents(
    document: &ProvDocument,
    aliases: &AgentAliases,
) -> Result<ProvDocument> {
    let mut merged = ProvDocument::new(document.namespace());
    let mut reroute: HashMap<NodeId, NodeId> = HashMap::new();

    for agent in document.agents() {
        let Some(canonical) = aliases.canonical_for(agent) else {
            merged.add_agent(agent.clone())?;
            continue;
        };
        let mut renamed = agent.clone();
        renamed.aliases = agent.external_identifiers();
        renamed.aliases.insert(canonical.to_string());
        renamed.id = AgentAliases::canonical_id(canonical);
        renamed.name = canonical.to_string();
        if renamed.id != agent.id {
            reroute.insert(agent.id.clone(), renamed.id.clone());
        }
        merged.add_agent(renamed)?;
    }

    for entity in document.entities() {
        merged.add_entity(entity.clone())?;
    }
    for activity in document.activities() {
        merged.add_activity(activity.clone())?;
    }
    for relation in document.relations() {
        merged.relate(relation.rewrite(|id| reroute.get(id).cloned().unwrap_or_else(|| id.clone())))?;
    }

    tracing::info!(
        "Merged {} agents into {} ({} rerouted)",
        document.agents().count(),
        merged.agents().count(),
        reroute.len()
    );
    Ok(merged)
}
