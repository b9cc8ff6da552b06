//! One-project pipeline: build every history, combine, then apply the
//! configured agent merging and pseudonymization

use serde::{Deserialize, Serialize};

use crate::commit::{CommitHistoryBuilder, CommitRecord};
use crate::compose::{combine, merge_duplicate_agents, pseudonymize};
use crate::config::ProvConfig;
use crate::error::{BuildOutput, Result};
use crate::resource::{
    ReleaseHistoryBuilder, ReleaseRecord, ResourceHistoryBuilder, ResourceRecord, TagRecord,
};

/// Everything extracted for one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInput {
    pub commits: Vec<CommitRecord>,
    pub resources: Vec<ResourceRecord>,
    pub tags: Vec<TagRecord>,
    pub releases: Vec<ReleaseRecord>,
}

/// Builds the provenance document of one project
#[derive(Debug, Clone)]
pub struct ProjectHistory<'a> {
    config: &'a ProvConfig,
}

impl<'a> ProjectHistory<'a> {
    pub fn new(config: &'a ProvConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, input: &ProjectInput) -> Result<BuildOutput> {
        let config = self.config;
        config.validate()?;
        tracing::info!("Building provenance of project {}", config.project);

        let commits = CommitHistoryBuilder::new(&config.project)
            .with_namespace(&config.namespace)
            .build(&input.commits)?;
        let resources = ResourceHistoryBuilder::new(&config.project)
            .with_namespace(&config.namespace)
            .build(&input.resources)?;
        let releases = ReleaseHistoryBuilder::new(&config.project)
            .with_namespace(&config.namespace)
            .build(&input.tags, &input.releases)?;

        let mut document =
            combine([&commits.document, &resources.document, &releases.document])?;
        if !config.agents.aliases.is_empty() {
            document = merge_duplicate_agents(&document, &config.agents.aliases)?;
        }
        if config.pseudonymize.enabled {
            document = pseudonymize(&document, &config.pseudonymize.salt)?;
        }

        let mut output = BuildOutput::new(document);
        output.warnings = [commits.warnings, resources.warnings, releases.warnings].concat();
        let stats = output.document.stats();
        tracing::info!(
            "Built project {}: {} agents, {} entities, {} activities, {} relations, {} warnings",
            config.project,
            stats.agents,
            stats.entities,
            stats.activities,
            stats.relations,
            output.warnings.len()
        );
        Ok(output)
    }
}
