//! Commit history builder
//!
//! Turns an ordered list of commit records into a provenance document:
//!
//! ```text
//! File ◄─specializationOf─ FileVersion@c2 ─wasDerivedFrom─► FileVersion@c1
//!                               │                                │
//!                        wasGeneratedBy                   wasGeneratedBy
//!                               ▼                                ▼
//!                          GitCommit c2 ───wasInformedBy───► GitCommit c1
//! ```
//!
//! Records are indexed before anything is built, so the input may arrive in
//! any order (git log order is reverse-chronological). Predecessors of a
//! modified path are found by walking each parent's ancestry until a commit
//! that touched the path is reached.

use std::collections::{BTreeSet, HashMap, HashSet};

use gitprov_model::{
    Activity, AgentRole, Entity, NodeId, ProvDocument, ProvRole, Relation, RelationKind,
    DEFAULT_NAMESPACE,
};

use crate::commit::record::{ChangeKind, ChangeRecord, CommitRecord};
use crate::error::{BuildOutput, BuildWarning, ProvError, Result};

/// State of a path right after a commit touched it
enum PathState {
    Present(NodeId),
    Removed,
}

/// Lookup tables over the whole input
struct CommitIndex<'a> {
    commits: HashMap<&'a str, &'a CommitRecord>,
    states: HashMap<(&'a str, &'a str), PathState>,
}

impl<'a> CommitIndex<'a> {
    fn new(project: &str, commits: &'a [CommitRecord]) -> Result<Self> {
        let mut index = Self {
            commits: HashMap::with_capacity(commits.len()),
            states: HashMap::new(),
        };
        for commit in commits {
            if index.commits.insert(commit.hash.as_str(), commit).is_some() {
                return Err(ProvError::DuplicateCommit {
                    hash: commit.hash.clone(),
                });
            }
            let hash = commit.hash.as_str();
            for change in &commit.changes {
                let Some(kind) = change.kind() else {
                    continue;
                };
                let state = match kind {
                    ChangeKind::Deleted => PathState::Removed,
                    _ => PathState::Present(Entity::file_version_id(project, &change.path, hash)),
                };
                index.states.insert((hash, change.path.as_str()), state);
                if kind == ChangeKind::Renamed {
                    if let Some(old_path) = change.old_path.as_deref() {
                        index
                            .states
                            .entry((hash, old_path))
                            .or_insert(PathState::Removed);
                    }
                }
            }
        }
        Ok(index)
    }

    fn contains(&self, hash: &str) -> bool {
        self.commits.contains_key(hash)
    }

    /// Latest versions of `path` reachable from the given parents.
    ///
    /// A parent that did not touch the path is skipped in favour of its own
    /// parents. Lines on which the path was deleted or renamed away contribute
    /// nothing. Versions reached over several lines are reported once.
    fn predecessors(&self, path: &'a str, parents: &'a [String]) -> Vec<NodeId> {
        let mut found = BTreeSet::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<&str> = parents.iter().rev().map(String::as_str).collect();
        while let Some(hash) = stack.pop() {
            if !visited.insert(hash) {
                continue;
            }
            match self.states.get(&(hash, path)) {
                Some(PathState::Present(version)) => {
                    found.insert(version.clone());
                }
                Some(PathState::Removed) => {}
                None => {
                    if let Some(commit) = self.commits.get(hash) {
                        stack.extend(commit.parents.iter().rev().map(String::as_str));
                    }
                }
            }
        }
        found.into_iter().collect()
    }
}

/// What to build for one change record
enum Step<'a> {
    Addition {
        change: &'a ChangeRecord,
        kind: ChangeKind,
    },
    Modification {
        change: &'a ChangeRecord,
        kind: ChangeKind,
        predecessors: Vec<NodeId>,
    },
    Deletion {
        change: &'a ChangeRecord,
    },
}

impl<'a> Step<'a> {
    fn change(&self) -> &'a ChangeRecord {
        match self {
            Step::Addition { change, .. }
            | Step::Modification { change, .. }
            | Step::Deletion { change } => *change,
        }
    }

    fn kind(&self) -> ChangeKind {
        match self {
            Step::Addition { kind, .. } | Step::Modification { kind, .. } => *kind,
            Step::Deletion { .. } => ChangeKind::Deleted,
        }
    }
}

/// Builds file version chains from commit records of one project
#[derive(Debug, Clone)]
pub struct CommitHistoryBuilder {
    project: String,
    namespace: String,
}

impl CommitHistoryBuilder {
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

    /// Build the document for the given commits, processed in supplied order
    pub fn build(&self, commits: &[CommitRecord]) -> Result<BuildOutput> {
        tracing::info!(
            "Building commit history of {} from {} commits",
            self.project,
            commits.len()
        );
        let index = CommitIndex::new(&self.project, commits)?;
        let mut output = BuildOutput::new(ProvDocument::new(self.namespace.clone()));

        let mut plans = Vec::with_capacity(commits.len());
        for commit in commits {
            let steps = self.plan(commit, &index, &mut output);
            plans.push((commit, steps));
        }
        for (commit, steps) in &plans {
            self.add_elements(&mut output.document, commit, steps)?;
        }
        for (commit, steps) in &plans {
            self.add_relations(&mut output, &index, commit, steps)?;
        }
        output.document.validate()?;

        tracing::info!(
            "Built commit history of {}: {} entities, {} relations, {} warnings",
            self.project,
            output.document.entities().count(),
            output.document.relations().count(),
            output.warnings.len()
        );
        Ok(output)
    }

    fn plan<'a>(
        &self,
        commit: &'a CommitRecord,
        index: &CommitIndex<'a>,
        output: &mut BuildOutput,
    ) -> Vec<Step<'a>> {
        let mut steps = Vec::with_capacity(commit.changes.len());
        for change in &commit.changes {
            let Some(kind) = change.kind() else {
                output.warn(BuildWarning::UnknownChangeKind {
                    commit: commit.hash.clone(),
                    path: change.path.clone(),
                    tag: change.tag.clone(),
                });
                continue;
            };
            let step = match kind {
                ChangeKind::Added => Step::Addition { change, kind },
                ChangeKind::Deleted => Step::Deletion { change },
                ChangeKind::Modified
                | ChangeKind::Changed
                | ChangeKind::Renamed
                | ChangeKind::Copied => {
                    let predecessors = index.predecessors(change.source_path(), &commit.parents);
                    if predecessors.is_empty() {
                        output.warn(BuildWarning::UnresolvedDerivation {
                            commit: commit.hash.clone(),
                            path: change.source_path().to_string(),
                        });
                        Step::Addition { change, kind }
                    } else {
                        Step::Modification {
                            change,
                            kind,
                            predecessors,
                        }
                    }
                }
            };
            steps.push(step);
        }
        steps
    }

    fn add_elements(
        &self,
        document: &mut ProvDocument,
        commit: &CommitRecord,
        steps: &[Step<'_>],
    ) -> Result<()> {
        document.insert_activity(
            Activity::git_commit(&commit.hash, commit.authored_at, commit.committed_at)
                .with_attribute("title", commit.title())
                .with_attribute("message", commit.message.as_str()),
        )?;
        document.add_agent(commit.author.to_agent(AgentRole::Author))?;
        document.add_agent(commit.committer.to_agent(AgentRole::Committer))?;

        for step in steps {
            let change = step.change();
            document.add_entity(Entity::file(&self.project, &change.path))?;
            if let Some(old_path) = change.old_path.as_deref() {
                document.add_entity(Entity::file(&self.project, old_path))?;
            }
            let mut version = Entity::file_version(
                &self.project,
                &change.path,
                &commit.hash,
                step.kind().as_str(),
            );
            if let Some(old_path) = change.old_path.as_deref() {
                version = version.with_attribute("old_path", old_path);
            }
            if let Some(checksum) = change.checksum.as_deref() {
                version = version.with_attribute("checksum", checksum);
            }
            document.add_entity(version)?;
        }
        Ok(())
    }

    fn add_relations(
        &self,
        output: &mut BuildOutput,
        index: &CommitIndex<'_>,
        commit: &CommitRecord,
        steps: &[Step<'_>],
    ) -> Result<()> {
        let activity = Activity::git_commit_id(&commit.hash);
        let author = commit.author.agent_id();
        let committer = commit.committer.agent_id();
        let at = commit.committed_at;

        let document = &mut output.document;
        document.relate(
            Relation::new(RelationKind::WasAssociatedWith, activity.clone(), author.clone())
                .with_role(ProvRole::Author),
        )?;
        document.relate(
            Relation::new(RelationKind::WasAssociatedWith, activity.clone(), committer)
                .with_role(ProvRole::Committer),
        )?;

        for step in steps {
            let change = step.change();
            let file = Entity::file(&self.project, &change.path).id;
            let version = Entity::file_version_id(&self.project, &change.path, &commit.hash);
            document.relate(Relation::new(
                RelationKind::SpecializationOf,
                version.clone(),
                file.clone(),
            ))?;

            match step {
                Step::Addition { .. } => {
                    document.relate(
                        Relation::new(RelationKind::WasGeneratedBy, version.clone(), activity.clone())
                            .at(at)
                            .with_role(ProvRole::FileVersionAtPointOfAddition),
                    )?;
                    document.relate(
                        Relation::new(RelationKind::WasGeneratedBy, file, activity.clone())
                            .at(at)
                            .with_role(ProvRole::File),
                    )?;
                    document.relate(Relation::new(
                        RelationKind::WasAttributedTo,
                        version,
                        author.clone(),
                    ))?;
                }
                Step::Modification { predecessors, .. } => {
                    for predecessor in predecessors {
                        document.relate(Relation::new(
                            RelationKind::WasDerivedFrom,
                            version.clone(),
                            predecessor.clone(),
                        ))?;
                        document.relate(
                            Relation::new(RelationKind::Used, activity.clone(), predecessor.clone())
                                .at(at)
                                .with_role(ProvRole::FileVersionToBeModified),
                        )?;
                    }
                    document.relate(
                        Relation::new(RelationKind::WasGeneratedBy, version.clone(), activity.clone())
                            .at(at)
                            .with_role(ProvRole::FileVersionAfterModification),
                    )?;
                    document.relate(Relation::new(
                        RelationKind::WasAttributedTo,
                        version,
                        author.clone(),
                    ))?;
                }
                Step::Deletion { .. } => {
                    document.relate(
                        Relation::new(RelationKind::WasInvalidatedBy, version, activity.clone())
                            .at(at)
                            .with_role(ProvRole::FileVersionAtPointOfDeletion),
                    )?;
                }
            }
        }

        for parent in &commit.parents {
            if index.contains(parent) {
                output.document.relate(Relation::new(
                    RelationKind::WasInformedBy,
                    activity.clone(),
                    Activity::git_commit_id(parent),
                ))?;
            } else {
                output.warn(BuildWarning::MissingParent {
                    commit: commit.hash.clone(),
                    parent: parent.clone(),
                });
            }
        }
        Ok(())
    }
}
