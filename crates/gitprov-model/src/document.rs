//! The provenance document: an arena of elements plus a set of relations
//!
//! Elements are keyed by their stable identifiers and relations are stored as
//! identifier pairs in an ordered set. Equal statements collapse, which gives
//! documents cheap structural equality and makes unions idempotent.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::element::{Activity, ElementCategory, Entity, EntityType, VersionOrigin};
use crate::error::{ModelError, Result};
use crate::id::NodeId;
use crate::relation::{ProvRole, Relation, RelationKind};

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "urn:gitprov:";

/// A format-agnostic provenance document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvDocument {
    namespace: String,
    agents: BTreeMap<NodeId, Agent>,
    entities: BTreeMap<NodeId, Entity>,
    activities: BTreeMap<NodeId, Activity>,
    relations: BTreeSet<Relation>,
}

impl Default for ProvDocument {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

/// Element and relation counts of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub agents: usize,
    pub entities: usize,
    pub activities: usize,
    pub relations: usize,
    pub relations_by_kind: BTreeMap<RelationKind, usize>,
}

impl ProvDocument {
    /// Create an empty document in the given namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            agents: BTreeMap::new(),
            entities: BTreeMap::new(),
            activities: BTreeMap::new(),
            relations: BTreeSet::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // ===== Elements =====

    /// Category of the element with the given identifier
    pub fn category(&self, id: &NodeId) -> Option<ElementCategory> {
        if self.agents.contains_key(id) {
            Some(ElementCategory::Agent)
        } else if self.entities.contains_key(id) {
            Some(ElementCategory::Entity)
        } else if self.activities.contains_key(id) {
            Some(ElementCategory::Activity)
        } else {
            None
        }
    }

    fn ensure_category(&self, id: &NodeId, expected: ElementCategory) -> Result<()> {
        match self.category(id) {
            Some(found) if found != expected => Err(ModelError::violation(
                id,
                format!("identifier already used by an {}", found),
            )),
            _ => Ok(()),
        }
    }

    /// Add an agent, joining it with an existing agent of the same identifier
    pub fn add_agent(&mut self, agent: Agent) -> Result<()> {
        self.ensure_category(&agent.id, ElementCategory::Agent)?;
        match self.agents.get_mut(&agent.id) {
            Some(existing) => existing.join(&agent),
            None => {
                self.agents.insert(agent.id.clone(), agent);
            }
        }
        Ok(())
    }

    /// Add an entity, joining it with an existing entity of the same identifier
    pub fn add_entity(&mut self, entity: Entity) -> Result<()> {
        self.ensure_category(&entity.id, ElementCategory::Entity)?;
        match self.entities.get_mut(&entity.id) {
            Some(existing) if existing.entity_type != entity.entity_type => {
                Err(ModelError::violation(
                    &entity.id,
                    format!(
                        "already recorded as {} not {}",
                        existing.entity_type, entity.entity_type
                    ),
                ))
            }
            Some(existing) => {
                existing.join(&entity);
                Ok(())
            }
            None => {
                self.entities.insert(entity.id.clone(), entity);
                Ok(())
            }
        }
    }

    /// Insert an entity that must not exist yet
    pub fn insert_entity(&mut self, entity: Entity) -> Result<()> {
        if self.category(&entity.id).is_some() {
            return Err(ModelError::violation(&entity.id, "entity already exists"));
        }
        self.entities.insert(entity.id.clone(), entity);
        Ok(())
    }

    /// Add an activity, joining it with an existing activity of the same identifier
    pub fn add_activity(&mut self, activity: Activity) -> Result<()> {
        self.ensure_category(&activity.id, ElementCategory::Activity)?;
        match self.activities.get_mut(&activity.id) {
            Some(existing) if existing.activity_type != activity.activity_type => {
                Err(ModelError::violation(
                    &activity.id,
                    format!(
                        "already recorded as {} not {}",
                        existing.activity_type, activity.activity_type
                    ),
                ))
            }
            Some(existing) => {
                existing.join(&activity);
                Ok(())
            }
            None => {
                self.activities.insert(activity.id.clone(), activity);
                Ok(())
            }
        }
    }

    /// Insert an activity that must not exist yet
    pub fn insert_activity(&mut self, activity: Activity) -> Result<()> {
        if self.category(&activity.id).is_some() {
            return Err(ModelError::violation(&activity.id, "activity already exists"));
        }
        self.activities.insert(activity.id.clone(), activity);
        Ok(())
    }

    pub fn agent(&self, id: &NodeId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn entity(&self, id: &NodeId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn activity(&self, id: &NodeId) -> Option<&Activity> {
        self.activities.get(id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }

    /// Entities of one type
    pub fn entities_of_type(&self, entity_type: EntityType) -> impl Iterator<Item = &Entity> {
        self.entities
            .values()
            .filter(move |e| e.entity_type == entity_type)
    }

    // ===== Relations =====

    /// Add a relation after checking it against the model's invariants
    pub fn relate(&mut self, relation: Relation) -> Result<()> {
        if self.relations.contains(&relation) {
            return Ok(());
        }
        self.check_relation(&relation)?;
        self.relations.insert(relation);
        Ok(())
    }

    /// Insert a resource version together with its specialization and origin.
    ///
    /// A first version is generated by the creation activity; any later
    /// version derives from exactly one predecessor.
    pub fn insert_resource_version(
        &mut self,
        version: Entity,
        resource: &NodeId,
        origin: VersionOrigin,
    ) -> Result<()> {
        if !matches!(version.entity_type, EntityType::ResourceVersion(_)) {
            return Err(ModelError::violation(
                &version.id,
                format!("{} is not a resource version", version.entity_type),
            ));
        }
        let id = version.id.clone();
        self.insert_entity(version)?;
        self.relate(Relation::new(
            RelationKind::SpecializationOf,
            id.clone(),
            resource.clone(),
        ))?;
        match origin {
            VersionOrigin::Creation(creation) => {
                let time = self
                    .activity(&creation)
                    .map(|a| a.started_at)
                    .ok_or_else(|| ModelError::DanglingReference {
                        relation: RelationKind::WasGeneratedBy.to_string(),
                        id: creation.to_string(),
                    })?;
                self.relate(
                    Relation::new(RelationKind::WasGeneratedBy, id, creation)
                        .at(time)
                        .with_role(ProvRole::ResourceVersionAtPointOfCreation),
                )
            }
            VersionOrigin::Predecessor(previous) => {
                self.relate(Relation::new(RelationKind::WasDerivedFrom, id, previous))
            }
        }
    }

    fn check_relation(&self, relation: &Relation) -> Result<()> {
        let dangling = |id: &NodeId| ModelError::DanglingReference {
            relation: relation.to_string(),
            id: id.to_string(),
        };
        let subject = self
            .category(&relation.subject)
            .ok_or_else(|| dangling(&relation.subject))?;
        let object = self
            .category(&relation.object)
            .ok_or_else(|| dangling(&relation.object))?;

        let (want_subject, want_object) = relation.kind.endpoints();
        if subject != want_subject || object != want_object {
            return Err(ModelError::IllegalRelation {
                relation: relation.kind.to_string(),
                subject: format!("{} {}", subject, relation.subject),
                object: format!("{} {}", object, relation.object),
            });
        }

        match relation.kind {
            RelationKind::SpecializationOf => self.check_specialization(relation),
            RelationKind::WasDerivedFrom => self.check_derivation(relation),
            RelationKind::WasGeneratedBy => self.check_generation(relation),
            _ => Ok(()),
        }
    }

    fn check_specialization(&self, relation: &Relation) -> Result<()> {
        let version = self.entity_type_of(&relation.subject)?;
        let root = self.entity_type_of(&relation.object)?;
        if !version.is_version() {
            return Err(ModelError::violation(
                &relation.subject,
                format!("{} is not a version and cannot specialize", version),
            ));
        }
        if !root.is_root() {
            return Err(ModelError::violation(
                &relation.object,
                format!("specialization target must be a root entity, found {}", root),
            ));
        }
        if !version.specializes(&root) {
            return Err(ModelError::violation(
                &relation.subject,
                format!("{} cannot specialize {}", version, root),
            ));
        }
        if let Some(existing) = self
            .outgoing(RelationKind::SpecializationOf, &relation.subject)
            .find(|r| r.object != relation.object)
        {
            return Err(ModelError::violation(
                &relation.subject,
                format!("already specializes {}", existing.object),
            ));
        }
        Ok(())
    }

    fn check_derivation(&self, relation: &Relation) -> Result<()> {
        if relation.subject == relation.object {
            return Err(ModelError::violation(
                &relation.subject,
                "a version cannot derive from itself",
            ));
        }
        if let EntityType::ResourceVersion(_) = self.entity_type_of(&relation.subject)? {
            if self.is_first_version(&relation.subject) {
                return Err(ModelError::violation(
                    &relation.subject,
                    "a first resource version derives from its creation, not from another version",
                ));
            }
            if let Some(existing) = self
                .outgoing(RelationKind::WasDerivedFrom, &relation.subject)
                .find(|r| r.object != relation.object)
            {
                return Err(ModelError::violation(
                    &relation.subject,
                    format!("already derives from {}", existing.object),
                ));
            }
        }
        Ok(())
    }

    fn check_generation(&self, relation: &Relation) -> Result<()> {
        let by_creation = self
            .activity(&relation.object)
            .map(|a| a.activity_type.is_creation())
            .unwrap_or(false);
        let is_resource_version = matches!(
            self.entity_type_of(&relation.subject)?,
            EntityType::ResourceVersion(_)
        );
        if by_creation
            && is_resource_version
            && self
                .outgoing(RelationKind::WasDerivedFrom, &relation.subject)
                .next()
                .is_some()
        {
            return Err(ModelError::violation(
                &relation.subject,
                "a derived resource version cannot also be generated by a creation",
            ));
        }
        Ok(())
    }

    fn entity_type_of(&self, id: &NodeId) -> Result<EntityType> {
        self.entities
            .get(id)
            .map(|e| e.entity_type)
            .ok_or_else(|| ModelError::violation(id, "not an entity"))
    }

    /// Whether the version was generated by a creation activity
    pub fn is_first_version(&self, id: &NodeId) -> bool {
        self.outgoing(RelationKind::WasGeneratedBy, id).any(|r| {
            self.activity(&r.object)
                .map(|a| a.activity_type.is_creation())
                .unwrap_or(false)
        })
    }

    /// Relations of the given kind whose subject is `subject`
    pub fn outgoing<'a>(
        &'a self,
        kind: RelationKind,
        subject: &NodeId,
    ) -> impl Iterator<Item = &'a Relation> + 'a {
        let subject = subject.clone();
        self.relations
            .range(Relation::lower_bound(kind, &subject)..)
            .take_while(move |r| r.kind == kind && r.subject == subject)
    }

    /// Relations of the given kind whose object is `object`
    pub fn incoming<'a>(
        &'a self,
        kind: RelationKind,
        object: &NodeId,
    ) -> impl Iterator<Item = &'a Relation> + 'a {
        let object = object.clone();
        self.relations_of_kind(kind)
            .filter(move |r| r.object == object)
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter()
    }

    pub fn relations_of_kind(&self, kind: RelationKind) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |r| r.kind == kind)
    }

    pub fn contains(&self, relation: &Relation) -> bool {
        self.relations.contains(relation)
    }

    // ===== Whole-document operations =====

    /// Union another document into this one
    pub fn extend(&mut self, other: &ProvDocument) -> Result<()> {
        if other.namespace < self.namespace {
            self.namespace = other.namespace.clone();
        }
        for agent in other.agents.values() {
            self.add_agent(agent.clone())?;
        }
        for entity in other.entities.values() {
            self.add_entity(entity.clone())?;
        }
        for activity in other.activities.values() {
            self.add_activity(activity.clone())?;
        }
        for relation in &other.relations {
            self.relate(relation.clone())?;
        }
        Ok(())
    }

    pub fn stats(&self) -> DocumentStats {
        let mut relations_by_kind = BTreeMap::new();
        for relation in &self.relations {
            *relations_by_kind.entry(relation.kind).or_insert(0) += 1;
        }
        DocumentStats {
            agents: self.agents.len(),
            entities: self.entities.len(),
            activities: self.activities.len(),
            relations: self.relations.len(),
            relations_by_kind,
        }
    }

    /// Check every whole-document invariant
    pub fn validate(&self) -> Result<()> {
        for entity in self.entities.values() {
            let count = self
                .outgoing(RelationKind::SpecializationOf, &entity.id)
                .count();
            if entity.entity_type.is_version() && count != 1 {
                return Err(ModelError::violation(
                    &entity.id,
                    format!("a version needs exactly one specialization, found {}", count),
                ));
            }
            if entity.entity_type.is_root() && count != 0 {
                return Err(ModelError::violation(
                    &entity.id,
                    "a root entity cannot specialize another entity",
                ));
            }
            if let EntityType::ResourceVersion(_) = entity.entity_type {
                let derivations = self
                    .outgoing(RelationKind::WasDerivedFrom, &entity.id)
                    .count();
                let first = self.is_first_version(&entity.id);
                if (first && derivations != 0) || (!first && derivations != 1) {
                    return Err(ModelError::violation(
                        &entity.id,
                        format!(
                            "resource version has {} predecessors (first version: {})",
                            derivations, first
                        ),
                    ));
                }
            }
        }

        for derivation in self.relations_of_kind(RelationKind::WasDerivedFrom) {
            if let (Some(later), Some(earlier)) = (
                self.generated_at(&derivation.subject),
                self.generated_at(&derivation.object),
            ) {
                if later < earlier {
                    return Err(ModelError::violation(
                        &derivation.subject,
                        format!(
                            "generated at {} before its predecessor {} ({})",
                            later, derivation.object, earlier
                        ),
                    ));
                }
            }
        }

        self.check_acyclic()
    }

    /// Earliest generation time of an entity
    pub fn generated_at(&self, id: &NodeId) -> Option<DateTime<Utc>> {
        self.outgoing(RelationKind::WasGeneratedBy, id)
            .filter_map(|r| r.time.or_else(|| self.activity(&r.object).map(|a| a.started_at)))
            .min()
    }

    fn check_acyclic(&self) -> Result<()> {
        let mut edges: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        for r in self.relations_of_kind(RelationKind::WasDerivedFrom) {
            edges.entry(&r.subject).or_default().push(&r.object);
        }

        let mut done: HashSet<&NodeId> = HashSet::new();
        for &start in edges.keys() {
            if done.contains(start) {
                continue;
            }
            // Iterative DFS; `path` holds the nodes on the current stack
            let mut path: HashSet<&NodeId> = HashSet::new();
            let mut stack: Vec<(&NodeId, usize)> = vec![(start, 0)];
            path.insert(start);
            while let Some((node, next)) = stack.pop() {
                let children = edges.get(node).map(Vec::as_slice).unwrap_or(&[]);
                if let Some(&child) = children.get(next) {
                    stack.push((node, next + 1));
                    if path.contains(child) {
                        return Err(ModelError::violation(child, "derivation cycle"));
                    }
                    if !done.contains(child) {
                        path.insert(child);
                        stack.push((child, 0));
                    }
                } else {
                    path.remove(node);
                    done.insert(node);
                }
            }
        }
        Ok(())
    }
}
