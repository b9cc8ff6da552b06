//! Resource history builder
//!
//! Each resource becomes a chain of immutable versions, one per annotation:
//!
//! ```text
//! Creation ◄─wasGeneratedBy─ first version ◄─wasDerivedFrom─ version@e1 ◄─ ...
//!    ▲                                                            │
//!    └────────────wasInformedBy──── Event e1 ◄──wasGeneratedBy────┘
//! ```

use std::collections::HashSet;

use gitprov_model::{
    Activity, AgentRole, Entity, EventKind, NodeId, ProvDocument, ProvRole, Relation,
    RelationKind, ResourceKind, VersionOrigin, DEFAULT_NAMESPACE,
};

use crate::classify::EventClassifier;
use crate::error::{BuildOutput, ProvError, Result};
use crate::resource::record::{Annotation, CommitLink, ResourceRecord};

/// Builds version chains for the platform resources of one project
#[derive(Debug, Clone)]
pub struct ResourceHistoryBuilder {
    project: String,
    namespace: String,
    classifier: EventClassifier,
}

impl ResourceHistoryBuilder {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            classifier: EventClassifier::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_classifier(mut self, classifier: EventClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn build(&self, resources: &[ResourceRecord]) -> Result<BuildOutput> {
        tracing::info!(
            "Building resource history of {} from {} resources",
            self.project,
            resources.len()
        );
        let mut seen = HashSet::with_capacity(resources.len());
        for record in resources {
            if !seen.insert((record.kind, record.id.as_str())) {
                return Err(ProvError::DuplicateResource {
                    kind: record.kind,
                    id: record.id.clone(),
                });
            }
        }

        let mut output = BuildOutput::new(ProvDocument::new(self.namespace.clone()));
        let mut unclassified = 0;
        for record in resources {
            unclassified += self.add_resource(&mut output.document, record)?;
        }
        output.document.validate()?;

        tracing::info!(
            "Built resource history of {}: {} activities, {} unclassified notes",
            self.project,
            output.document.activities().count(),
            unclassified
        );
        Ok(output)
    }

    /// Add one resource and its version chain; returns the number of
    /// unclassified events
    fn add_resource(&self, document: &mut ProvDocument, record: &ResourceRecord) -> Result<usize> {
        let kind = record.kind;
        let mut resource = Entity::resource(kind, &self.project, &record.id);
        if let Some(iid) = record.iid.as_deref() {
            resource = resource.with_attribute("iid", iid);
        }
        if let Some(title) = record.title.as_deref() {
            resource = resource.with_attribute("title", title);
        }
        if let Some(url) = record.url.as_deref() {
            resource = resource.with_attribute("url", url);
        }
        let resource_id = resource.id.clone();
        let creation = Activity::creation(
            kind,
            &self.project,
            &record.id,
            record.created_at,
            record.closed_at.unwrap_or(record.created_at),
        );
        let creation_id = creation.id.clone();
        let creator = record.creator.agent_id();

        document.insert_entity(resource)?;
        document.insert_activity(creation)?;
        document.add_agent(record.creator.to_agent(AgentRole::Creator))?;
        document.relate(
            Relation::new(RelationKind::WasGeneratedBy, resource_id.clone(), creation_id.clone())
                .at(record.created_at)
                .with_role(ProvRole::Resource),
        )?;
        document.relate(Relation::new(
            RelationKind::WasAttributedTo,
            resource_id.clone(),
            creator.clone(),
        ))?;
        document.relate(
            Relation::new(RelationKind::WasAssociatedWith, creation_id.clone(), creator.clone())
                .with_role(ProvRole::Creator),
        )?;

        let first = Entity::first_resource_version(kind, &self.project, &record.id);
        let first_id = first.id.clone();
        document.insert_resource_version(
            first,
            &resource_id,
            VersionOrigin::Creation(creation_id.clone()),
        )?;
        document.relate(Relation::new(RelationKind::WasAttributedTo, first_id.clone(), creator))?;

        if kind == ResourceKind::Commit {
            if let Some(link) = &record.commit {
                self.link_commit(document, &creation_id, link)?;
            }
        }

        let mut annotations: Vec<&Annotation> = record.annotations.iter().collect();
        annotations.sort_by_key(|a| a.created_at);

        let mut previous_activity = creation_id;
        let mut previous_version = first_id;
        let mut unclassified = 0;
        for annotation in annotations {
            let (event, version) = self.add_event(
                document,
                kind,
                &record.id,
                &resource_id,
                annotation,
                &previous_activity,
                &previous_version,
            )?;
            if document.activity(&event).and_then(|a| a.event_kind()) == Some(EventKind::Unclassified) {
                unclassified += 1;
            }
            previous_activity = event;
            previous_version = version;
        }
        Ok(unclassified)
    }

    #[allow(clippy::too_many_arguments)]
    fn add_event(
        &self,
        document: &mut ProvDocument,
        kind: ResourceKind,
        resource: &str,
        resource_id: &NodeId,
        annotation: &Annotation,
        previous_activity: &NodeId,
        previous_version: &NodeId,
    ) -> Result<(NodeId, NodeId)> {
        let classified = annotation.body.classify(&self.classifier);
        let at = annotation.created_at;
        let mut event = Activity::event(classified.kind, resource_id, &annotation.id, at);
        for (key, value) in &classified.attributes {
            event = event.with_attribute(key, value.as_str());
        }
        let event_id = event.id.clone();
        let initiator = annotation.author.agent_id();

        document.insert_activity(event)?;
        document.add_agent(annotation.author.to_agent(AgentRole::EventInitiator))?;

        let version = Entity::event_resource_version(kind, &self.project, resource, &annotation.id);
        let version_id = version.id.clone();
        document.insert_resource_version(
            version,
            resource_id,
            VersionOrigin::Predecessor(previous_version.clone()),
        )?;
        document.relate(
            Relation::new(RelationKind::WasGeneratedBy, version_id.clone(), event_id.clone())
                .at(at)
                .with_role(ProvRole::ResourceVersionAfterAnnotation),
        )?;
        document.relate(Relation::new(
            RelationKind::WasAttributedTo,
            version_id.clone(),
            initiator.clone(),
        ))?;
        document.relate(
            Relation::new(RelationKind::WasAssociatedWith, event_id.clone(), initiator)
                .with_role(ProvRole::EventInitiator),
        )?;
        document.relate(
            Relation::new(RelationKind::Used, event_id.clone(), previous_version.clone())
                .at(at)
                .with_role(ProvRole::ResourceVersionToBeAnnotated),
        )?;
        document.relate(Relation::new(
            RelationKind::WasInformedBy,
            event_id.clone(),
            previous_activity.clone(),
        ))?;
        Ok((event_id, version_id))
    }

    /// Tie a commit resource's creation to the git commit it shows
    fn link_commit(
        &self,
        document: &mut ProvDocument,
        creation: &NodeId,
        link: &CommitLink,
    ) -> Result<()> {
        let commit = Activity::git_commit(&link.hash, link.authored_at, link.committed_at);
        let commit_id = commit.id.clone();
        document.add_activity(commit)?;
        document.add_agent(link.committer.to_agent(AgentRole::Committer))?;
        document.relate(
            Relation::new(
                RelationKind::WasAssociatedWith,
                commit_id.clone(),
                link.committer.agent_id(),
            )
            .with_role(ProvRole::Committer),
        )?;
        document.relate(Relation::new(
            RelationKind::WasInformedBy,
            creation.clone(),
            commit_id,
        ))?;
        Ok(())
    }
}
