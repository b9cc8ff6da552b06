//! Commit records as delivered by the git traversal collaborator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// How a commit touched a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    /// Metadata-only change (mode, type)
    Changed,
    Deleted,
    Renamed,
    Copied,
}

impl ChangeKind {
    /// Parse a change tag.
    ///
    /// Accepts the spelled-out names as well as git's diff status letters,
    /// including scored forms such as `R087`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        match tag.to_ascii_lowercase().as_str() {
            "added" | "a" => return Some(ChangeKind::Added),
            "modified" | "m" => return Some(ChangeKind::Modified),
            "changed" | "t" => return Some(ChangeKind::Changed),
            "deleted" | "d" => return Some(ChangeKind::Deleted),
            "renamed" => return Some(ChangeKind::Renamed),
            "copied" => return Some(ChangeKind::Copied),
            _ => {}
        }
        let (letter, score) = tag.split_at(tag.chars().next().map_or(0, char::len_utf8));
        if !score.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        match letter {
            "R" | "r" => Some(ChangeKind::Renamed),
            "C" | "c" => Some(ChangeKind::Copied),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Changed => "changed",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Copied => "copied",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One path touched by a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Path after the change
    pub path: String,
    /// Source path of a rename or copy
    pub old_path: Option<String>,
    /// Raw change tag; see [`ChangeKind::from_tag`]
    pub tag: String,
    /// Content checksum of the path after the change
    pub checksum: Option<String>,
}

impl ChangeRecord {
    pub fn new(path: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            old_path: None,
            tag: tag.into(),
            checksum: None,
        }
    }

    pub fn added(path: impl Into<String>) -> Self {
        Self::new(path, "added")
    }

    pub fn modified(path: impl Into<String>) -> Self {
        Self::new(path, "modified")
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self::new(path, "deleted")
    }

    pub fn renamed(old_path: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            old_path: Some(old_path.into()),
            ..Self::new(path, "renamed")
        }
    }

    pub fn copied(old_path: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            old_path: Some(old_path.into()),
            ..Self::new(path, "copied")
        }
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    pub fn kind(&self) -> Option<ChangeKind> {
        ChangeKind::from_tag(&self.tag)
    }

    /// Path the previous state is looked up under
    pub fn source_path(&self) -> &str {
        self.old_path.as_deref().unwrap_or(&self.path)
    }
}

/// One commit of the git history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    /// Parent hashes, first parent first
    pub parents: Vec<String>,
    pub author: Identity,
    pub authored_at: DateTime<Utc>,
    pub committer: Identity,
    pub committed_at: DateTime<Utc>,
    pub message: String,
    pub changes: Vec<ChangeRecord>,
}

impl CommitRecord {
    /// A commit authored and committed by the same person at the same time
    pub fn new(hash: impl Into<String>, author: Identity, at: DateTime<Utc>) -> Self {
        Self {
            hash: hash.into(),
            parents: Vec::new(),
            committer: author.clone(),
            author,
            authored_at: at,
            committed_at: at,
            message: String::new(),
            changes: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_committer(mut self, committer: Identity, at: DateTime<Utc>) -> Self {
        self.committer = committer;
        self.committed_at = at;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_change(mut self, change: ChangeRecord) -> Self {
        self.changes.push(change);
        self
    }

    /// First line of the message
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}
