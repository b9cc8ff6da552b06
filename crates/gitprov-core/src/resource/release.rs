//! Tags and releases
//!
//! A tag is a collection entity created by the tag author and pointing at a
//! commit; a release is a collection created from a tag, holding its assets
//! and evidences:
//!
//! ```text
//! CommitResource ─hadMember─► Tag ─hadMember─► Release ─hadMember─► Asset / Evidence
//! ```

use chrono::{DateTime, Utc};
use gitprov_model::{
    Activity, AgentRole, Entity, ProvDocument, ProvRole, Relation, RelationKind, ResourceKind,
    DEFAULT_NAMESPACE,
};
use serde::{Deserialize, Serialize};

use crate::error::{BuildOutput, Result};
use crate::identity::Identity;

/// A git tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
    /// Hash of the tagged commit
    pub hash: String,
    pub message: Option<String>,
    pub author: Identity,
    pub created_at: DateTime<Utc>,
}

/// A downloadable release artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub url: String,
    pub format: String,
}

/// Release evidence collected by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub sha: String,
    pub url: String,
    pub collected_at: DateTime<Utc>,
}

/// A platform release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub name: String,
    pub tag_name: Option<String>,
    pub description: Option<String>,
    pub author: Option<Identity>,
    pub created_at: DateTime<Utc>,
    pub released_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<AssetRecord>,
    #[serde(default)]
    pub evidences: Vec<EvidenceRecord>,
}

impl ReleaseRecord {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            tag_name: None,
            description: None,
            author: None,
            created_at,
            released_at: None,
            assets: Vec::new(),
            evidences: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = Some(tag_name.into());
        self
    }

    pub fn with_author(mut self, author: Identity) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_asset(mut self, url: impl Into<String>, format: impl Into<String>) -> Self {
        self.assets.push(AssetRecord {
            url: url.into(),
            format: format.into(),
        });
        self
    }
}

/// Builds tag and release collections of one project
#[derive(Debug, Clone)]
pub struct ReleaseHistoryBuilder {
    project: String,
    namespace: String,
}

impl ReleaseHistoryBuilder {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn build(&self, tags: &[TagRecord], releases: &[ReleaseRecord]) -> Result<BuildOutput> {
        tracing::info!(
            "Building {} tags and {} releases of {}",
            tags.len(),
            releases.len(),
            self.project
        );
        let mut output = BuildOutput::new(ProvDocument::new(self.namespace.clone()));
        for tag in tags {
            self.add_tag(&mut output.document, tag)?;
        }
        for release in releases {
            self.add_release(&mut output.document, release)?;
        }
        output.document.validate()?;
        Ok(output)
    }

    fn add_tag(&self, document: &mut ProvDocument, tag: &TagRecord) -> Result<()> {
        let mut entity =
            Entity::tag(&self.project, &tag.name).with_attribute("hexsha", tag.hash.as_str());
        if let Some(message) = tag.message.as_deref() {
            entity = entity.with_attribute("message", message);
        }
        let tag_id = entity.id.clone();
        let creation = Activity::tag_creation(&self.project, &tag.name, tag.created_at);
        let creation_id = creation.id.clone();
        let author = tag.author.agent_id();
        let commit = Entity::resource(ResourceKind::Commit, &self.project, &tag.hash);
        let commit_id = commit.id.clone();

        document.add_entity(entity)?;
        document.add_activity(creation)?;
        document.add_agent(tag.author.to_agent(AgentRole::TagAuthor))?;
        document.add_entity(commit)?;
        document.relate(
            Relation::new(RelationKind::WasGeneratedBy, tag_id.clone(), creation_id.clone())
                .at(tag.created_at)
                .with_role(ProvRole::Tag),
        )?;
        document.relate(Relation::new(
            RelationKind::WasAttributedTo,
            tag_id.clone(),
            author.clone(),
        ))?;
        document.relate(
            Relation::new(RelationKind::WasAssociatedWith, creation_id, author)
                .with_role(ProvRole::TagAuthor),
        )?;
        document.relate(Relation::new(RelationKind::HadMember, commit_id, tag_id))?;
        Ok(())
    }

    fn add_release(&self, document: &mut ProvDocument, release: &ReleaseRecord) -> Result<()> {
        let mut entity = Entity::release(&self.project, &release.name);
        if let Some(description) = release.description.as_deref() {
            entity = entity.with_attribute("description", description);
        }
        let release_id = entity.id.clone();
        let creation = Activity::release_creation(
            &self.project,
            &release.name,
            release.created_at,
            release.released_at.unwrap_or(release.created_at),
        );
        let creation_id = creation.id.clone();

        document.add_entity(entity)?;
        document.add_activity(creation)?;
        document.relate(
            Relation::new(RelationKind::WasGeneratedBy, release_id.clone(), creation_id.clone())
                .at(release.created_at)
                .with_role(ProvRole::Release),
        )?;

        if let Some(author) = &release.author {
            document.add_agent(author.to_agent(AgentRole::ReleaseAuthor))?;
            document.relate(Relation::new(
                RelationKind::WasAttributedTo,
                release_id.clone(),
                author.agent_id(),
            ))?;
            document.relate(
                Relation::new(RelationKind::WasAssociatedWith, creation_id, author.agent_id())
                    .with_role(ProvRole::ReleaseAuthor),
            )?;
        }

        if let Some(tag_name) = release.tag_name.as_deref() {
            let tag_id = Entity::tag(&self.project, tag_name).id;
            if document.entity(&tag_id).is_some() {
                document.relate(Relation::new(
                    RelationKind::HadMember,
                    tag_id,
                    release_id.clone(),
                ))?;
            } else {
                tracing::debug!("Release {} names unknown tag {}", release.name, tag_name);
            }
        }

        for asset in &release.assets {
            let entity = Entity::asset(&asset.url, &asset.format);
            let asset_id = entity.id.clone();
            document.add_entity(entity)?;
            document.relate(Relation::new(
                RelationKind::HadMember,
                release_id.clone(),
                asset_id,
            ))?;
        }
        for evidence in &release.evidences {
            let entity = Entity::evidence(&evidence.sha, &evidence.url, evidence.collected_at);
            let evidence_id = entity.id.clone();
            document.add_entity(entity)?;
            document.relate(Relation::new(
                RelationKind::HadMember,
                release_id.clone(),
                evidence_id,
            ))?;
        }
        Ok(())
    }
}
