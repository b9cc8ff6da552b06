//! Resource records as delivered by the platform fetch collaborator

use chrono::{DateTime, Utc};
use gitprov_model::ResourceKind;
use serde::{Deserialize, Serialize};

use crate::classify::structured::{
    award_event, comment_event, diff_note_event, label_event, note_event,
};
use crate::classify::{ClassifiedEvent, DiffPosition, EventClassifier, LabelAction};
use crate::identity::Identity;

/// What an annotation says
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnnotationBody {
    /// Platform-generated note, classified from its text
    SystemNote { body: String },
    /// Note written by a person on an issue or merge request
    Note { body: String },
    /// Note attached to lines of a merge request diff
    DiffNote { body: String, position: DiffPosition },
    /// Comment on a commit
    Comment { body: String },
    /// Structured label event
    Label { action: LabelAction, label: String },
    /// Structured emoji reaction
    Award { emoji: String },
}

impl AnnotationBody {
    /// Typed event for this annotation. Only system notes go through the
    /// text classifier.
    pub fn classify(&self, classifier: &EventClassifier) -> ClassifiedEvent {
        match self {
            AnnotationBody::SystemNote { body } => classifier.classify(body),
            AnnotationBody::Note { body } => note_event(body),
            AnnotationBody::DiffNote { body, position } => diff_note_event(body, position),
            AnnotationBody::Comment { body } => comment_event(body),
            AnnotationBody::Label { action, label } => label_event(*action, label),
            AnnotationBody::Award { emoji } => award_event(emoji),
        }
    }
}

/// One dated annotation of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Platform id, unique within the resource
    pub id: String,
    pub author: Identity,
    pub created_at: DateTime<Utc>,
    pub body: AnnotationBody,
}

impl Annotation {
    pub fn new(
        id: impl Into<String>,
        author: Identity,
        created_at: DateTime<Utc>,
        body: AnnotationBody,
    ) -> Self {
        Self {
            id: id.into(),
            author,
            created_at,
            body,
        }
    }

    pub fn system_note(
        id: impl Into<String>,
        author: Identity,
        created_at: DateTime<Utc>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(id, author, created_at, AnnotationBody::SystemNote { body: body.into() })
    }

    pub fn note(
        id: impl Into<String>,
        author: Identity,
        created_at: DateTime<Utc>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(id, author, created_at, AnnotationBody::Note { body: body.into() })
    }

    pub fn diff_note(
        id: impl Into<String>,
        author: Identity,
        created_at: DateTime<Utc>,
        body: impl Into<String>,
        position: DiffPosition,
    ) -> Self {
        Self::new(
            id,
            author,
            created_at,
            AnnotationBody::DiffNote {
                body: body.into(),
                position,
            },
        )
    }

    pub fn label(
        id: impl Into<String>,
        author: Identity,
        created_at: DateTime<Utc>,
        action: LabelAction,
        label: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            author,
            created_at,
            AnnotationBody::Label {
                action,
                label: label.into(),
            },
        )
    }

    pub fn award(
        id: impl Into<String>,
        author: Identity,
        created_at: DateTime<Utc>,
        emoji: impl Into<String>,
    ) -> Self {
        Self::new(id, author, created_at, AnnotationBody::Award { emoji: emoji.into() })
    }
}

/// The git commit behind a commit resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitLink {
    pub hash: String,
    pub committer: Identity,
    pub authored_at: DateTime<Utc>,
    pub committed_at: DateTime<Utc>,
}

/// An issue, merge request or commit view with its annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub kind: ResourceKind,
    /// Platform id, unique per kind within the project
    pub id: String,
    /// Project-scoped number shown to users
    pub iid: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub creator: Identity,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Only for commit resources
    pub commit: Option<CommitLink>,
    pub annotations: Vec<Annotation>,
}

impl ResourceRecord {
    pub fn new(
        kind: ResourceKind,
        id: impl Into<String>,
        creator: Identity,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            iid: None,
            title: None,
            url: None,
            creator,
            created_at,
            closed_at: None,
            commit: None,
            annotations: Vec::new(),
        }
    }

    pub fn with_iid(mut self, iid: impl Into<String>) -> Self {
        self.iid = Some(iid.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn closed_at(mut self, at: DateTime<Utc>) -> Self {
        self.closed_at = Some(at);
        self
    }

    pub fn with_commit(mut self, commit: CommitLink) -> Self {
        self.commit = Some(commit);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}
