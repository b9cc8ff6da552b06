//! Events that never go through text classification

use gitprov_model::EventKind;
use serde::{Deserialize, Serialize};

use super::ClassifiedEvent;

/// Whether a label record adds or removes the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelAction {
    Add,
    Remove,
}

impl LabelAction {
    /// Parse the platform's action field (`add` / `remove`)
    pub fn parse(action: &str) -> Option<Self> {
        match action.trim().to_ascii_lowercase().as_str() {
            "add" | "added" => Some(LabelAction::Add),
            "remove" | "removed" => Some(LabelAction::Remove),
            _ => None,
        }
    }
}

/// Where a diff note sits in a merge request diff
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffPosition {
    /// `text` or `image`
    pub position_type: String,
    pub base_sha: String,
    pub start_sha: String,
    pub head_sha: String,
    pub old_path: String,
    pub new_path: String,
    /// Absent for added lines
    #[serde(default)]
    pub old_line: Option<u32>,
    /// Absent for removed lines
    #[serde(default)]
    pub new_line: Option<u32>,
}

/// A label record
pub fn label_event(action: LabelAction, label: &str) -> ClassifiedEvent {
    let kind = match action {
        LabelAction::Add => EventKind::AddLabel,
        LabelAction::Remove => EventKind::RemoveLabel,
    };
    ClassifiedEvent::new(kind).with_attribute("label", label)
}

/// An emoji reaction
pub fn award_event(emoji: &str) -> ClassifiedEvent {
    ClassifiedEvent::new(EventKind::AwardEmoji).with_attribute("emoji", emoji)
}

/// A note written by a person
pub fn note_event(body: &str) -> ClassifiedEvent {
    ClassifiedEvent::new(EventKind::AddNote).with_attribute("body", body)
}

/// A comment on a commit
pub fn comment_event(body: &str) -> ClassifiedEvent {
    ClassifiedEvent::new(EventKind::AddComment).with_attribute("body", body)
}

/// A note on lines of a merge request diff, with its diff position
pub fn diff_note_event(body: &str, position: &DiffPosition) -> ClassifiedEvent {
    let mut event = ClassifiedEvent::new(EventKind::ChangedLines)
        .with_attribute("body", body)
        .with_attribute("position_type", position.position_type.as_str())
        .with_attribute("position_base_sha", position.base_sha.as_str())
        .with_attribute("position_start_sha", position.start_sha.as_str())
        .with_attribute("position_head_sha", position.head_sha.as_str())
        .with_attribute("position_old_path", position.old_path.as_str())
        .with_attribute("position_new_path", position.new_path.as_str());
    if let Some(line) = position.old_line {
        event = event.with_attribute("position_old_line", line.to_string());
    }
    if let Some(line) = position.new_line {
        event = event.with_attribute("position_new_line", line.to_string());
    }
    event
}
