//! The event vocabulary
//!
//! A closed set of event kinds a resource can undergo. System notes are mapped
//! onto these by the classifier; label and emoji records map directly; notes
//! that match nothing become [`EventKind::Unclassified`].

use serde::{Deserialize, Serialize};

/// Kind of an event on a platform resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ChangeTargetBranch,
    ChangeEpic,
    AddToEpic,
    RemoveFromEpic,
    AddToExternalEpic,
    RemoveFromExternalEpic,
    CloseByExternalCommit,
    CloseByExternalMergeRequest,
    CloseByMergeRequest,
    CloseByCommit,
    RestoreSourceBranch,
    AddLabel,
    RemoveLabel,
    CreateBranch,
    MarkTaskAsIncomplete,
    MarkTaskAsDone,
    AddCommits,
    AddressInMergeRequest,
    UnmarkAsWorkInProgress,
    MarkAsWorkInProgress,
    MarkMergeRequestReady,
    MarkMergeRequestDraft,
    Merge,
    ChangeDescription,
    ChangeTitle,
    MoveFrom,
    MoveTo,
    Reopen,
    Close,
    UnrelateFromExternalIssue,
    RelateToExternalIssue,
    UnrelateFromIssue,
    RelateToIssue,
    HasDuplicate,
    MarkAsDuplicate,
    MakeVisible,
    MakeConfidential,
    RemoveWeight,
    ChangeWeight,
    RemoveDueDate,
    ChangeDueDate,
    RemoveTimeEstimate,
    ChangeTimeEstimate,
    UnlockMergeRequest,
    LockMergeRequest,
    UnlockIssue,
    LockIssue,
    RemoveSpentTime,
    SubtractSpentTime,
    AddSpentTime,
    RemoveMilestone,
    ChangeMilestone,
    UnassignUser,
    AssignUser,
    ReassignUser,
    RequestReview,
    CancelReviewRequest,
    MentionInExternalMergeRequest,
    MentionInMergeRequest,
    MentionInExternalCommit,
    MentionInCommit,
    MentionInExternalIssue,
    MentionInIssue,
    MentionInEpic,
    ResolveThreads,
    ResolveAllDiscussions,
    ApproveMergeRequest,
    UnapproveMergeRequest,
    EnableAutomaticMergeOnPipelineSuccess,
    EnableAutomaticMergeOnBuildSuccess,
    AbortAutomaticMerge,
    CancelAutomaticMerge,
    CreateIssueFromDiscussion,
    StartMergeTrain,
    RemoveFromMergeTrain,
    EnableAutomaticAddToMergeTrain,
    /// A user-written note on an issue or merge request
    AddNote,
    /// A user-written comment on a commit
    AddComment,
    /// A note attached to lines of a merge request diff
    ChangedLines,
    AwardEmoji,
    /// A system note no rule recognized
    Unclassified,
}

impl EventKind {
    /// Every kind, in declaration order
    pub const ALL: [EventKind; 81] = [
        EventKind::ChangeTargetBranch,
        EventKind::ChangeEpic,
        EventKind::AddToEpic,
        EventKind::RemoveFromEpic,
        EventKind::AddToExternalEpic,
        EventKind::RemoveFromExternalEpic,
        EventKind::CloseByExternalCommit,
        EventKind::CloseByExternalMergeRequest,
        EventKind::CloseByMergeRequest,
        EventKind::CloseByCommit,
        EventKind::RestoreSourceBranch,
        EventKind::AddLabel,
        EventKind::RemoveLabel,
        EventKind::CreateBranch,
        EventKind::MarkTaskAsIncomplete,
        EventKind::MarkTaskAsDone,
        EventKind::AddCommits,
        EventKind::AddressInMergeRequest,
        EventKind::UnmarkAsWorkInProgress,
        EventKind::MarkAsWorkInProgress,
        EventKind::MarkMergeRequestReady,
        EventKind::MarkMergeRequestDraft,
        EventKind::Merge,
        EventKind::ChangeDescription,
        EventKind::ChangeTitle,
        EventKind::MoveFrom,
        EventKind::MoveTo,
        EventKind::Reopen,
        EventKind::Close,
        EventKind::UnrelateFromExternalIssue,
        EventKind::RelateToExternalIssue,
        EventKind::UnrelateFromIssue,
        EventKind::RelateToIssue,
        EventKind::HasDuplicate,
        EventKind::MarkAsDuplicate,
        EventKind::MakeVisible,
        EventKind::MakeConfidential,
        EventKind::RemoveWeight,
        EventKind::ChangeWeight,
        EventKind::RemoveDueDate,
        EventKind::ChangeDueDate,
        EventKind::RemoveTimeEstimate,
        EventKind::ChangeTimeEstimate,
        EventKind::UnlockMergeRequest,
        EventKind::LockMergeRequest,
        EventKind::UnlockIssue,
        EventKind::LockIssue,
        EventKind::RemoveSpentTime,
        EventKind::SubtractSpentTime,
        EventKind::AddSpentTime,
        EventKind::RemoveMilestone,
        EventKind::ChangeMilestone,
        EventKind::UnassignUser,
        EventKind::AssignUser,
        EventKind::ReassignUser,
        EventKind::RequestReview,
        EventKind::CancelReviewRequest,
        EventKind::MentionInExternalMergeRequest,
        EventKind::MentionInMergeRequest,
        EventKind::MentionInExternalCommit,
        EventKind::MentionInCommit,
        EventKind::MentionInExternalIssue,
        EventKind::MentionInIssue,
        EventKind::MentionInEpic,
        EventKind::ResolveThreads,
        EventKind::ResolveAllDiscussions,
        EventKind::ApproveMergeRequest,
        EventKind::UnapproveMergeRequest,
        EventKind::EnableAutomaticMergeOnPipelineSuccess,
        EventKind::EnableAutomaticMergeOnBuildSuccess,
        EventKind::AbortAutomaticMerge,
        EventKind::CancelAutomaticMerge,
        EventKind::CreateIssueFromDiscussion,
        EventKind::StartMergeTrain,
        EventKind::RemoveFromMergeTrain,
        EventKind::EnableAutomaticAddToMergeTrain,
        EventKind::AddNote,
        EventKind::AddComment,
        EventKind::ChangedLines,
        EventKind::AwardEmoji,
        EventKind::Unclassified,
    ];

    /// Snake-case name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ChangeTargetBranch => "change_target_branch",
            EventKind::ChangeEpic => "change_epic",
            EventKind::AddToEpic => "add_to_epic",
            EventKind::RemoveFromEpic => "remove_from_epic",
            EventKind::AddToExternalEpic => "add_to_external_epic",
            EventKind::RemoveFromExternalEpic => "remove_from_external_epic",
            EventKind::CloseByExternalCommit => "close_by_external_commit",
            EventKind::CloseByExternalMergeRequest => "close_by_external_merge_request",
            EventKind::CloseByMergeRequest => "close_by_merge_request",
            EventKind::CloseByCommit => "close_by_commit",
            EventKind::RestoreSourceBranch => "restore_source_branch",
            EventKind::AddLabel => "add_label",
            EventKind::RemoveLabel => "remove_label",
            EventKind::CreateBranch => "create_branch",
            EventKind::MarkTaskAsIncomplete => "mark_task_as_incomplete",
            EventKind::MarkTaskAsDone => "mark_task_as_done",
            EventKind::AddCommits => "add_commits",
            EventKind::AddressInMergeRequest => "address_in_merge_request",
            EventKind::UnmarkAsWorkInProgress => "unmark_as_work_in_progress",
            EventKind::MarkAsWorkInProgress => "mark_as_work_in_progress",
            EventKind::MarkMergeRequestReady => "mark_merge_request_ready",
            EventKind::MarkMergeRequestDraft => "mark_merge_request_draft",
            EventKind::Merge => "merge",
            EventKind::ChangeDescription => "change_description",
            EventKind::ChangeTitle => "change_title",
            EventKind::MoveFrom => "move_from",
            EventKind::MoveTo => "move_to",
            EventKind::Reopen => "reopen",
            EventKind::Close => "close",
            EventKind::UnrelateFromExternalIssue => "unrelate_from_external_issue",
            EventKind::RelateToExternalIssue => "relate_to_external_issue",
            EventKind::UnrelateFromIssue => "unrelate_from_issue",
            EventKind::RelateToIssue => "relate_to_issue",
            EventKind::HasDuplicate => "has_duplicate",
            EventKind::MarkAsDuplicate => "mark_as_duplicate",
            EventKind::MakeVisible => "make_visible",
            EventKind::MakeConfidential => "make_confidential",
            EventKind::RemoveWeight => "remove_weight",
            EventKind::ChangeWeight => "change_weight",
            EventKind::RemoveDueDate => "remove_due_date",
            EventKind::ChangeDueDate => "change_due_date",
            EventKind::RemoveTimeEstimate => "remove_time_estimate",
            EventKind::ChangeTimeEstimate => "change_time_estimate",
            EventKind::UnlockMergeRequest => "unlock_merge_request",
            EventKind::LockMergeRequest => "lock_merge_request",
            EventKind::UnlockIssue => "unlock_issue",
            EventKind::LockIssue => "lock_issue",
            EventKind::RemoveSpentTime => "remove_spent_time",
            EventKind::SubtractSpentTime => "subtract_spent_time",
            EventKind::AddSpentTime => "add_spent_time",
            EventKind::RemoveMilestone => "remove_milestone",
            EventKind::ChangeMilestone => "change_milestone",
            EventKind::UnassignUser => "unassign_user",
            EventKind::AssignUser => "assign_user",
            EventKind::ReassignUser => "reassign_user",
            EventKind::RequestReview => "request_review",
            EventKind::CancelReviewRequest => "cancel_review_request",
            EventKind::MentionInExternalMergeRequest => "mention_in_external_merge_request",
            EventKind::MentionInMergeRequest => "mention_in_merge_request",
            EventKind::MentionInExternalCommit => "mention_in_external_commit",
            EventKind::MentionInCommit => "mention_in_commit",
            EventKind::MentionInExternalIssue => "mention_in_external_issue",
            EventKind::MentionInIssue => "mention_in_issue",
            EventKind::MentionInEpic => "mention_in_epic",
            EventKind::ResolveThreads => "resolve_threads",
            EventKind::ResolveAllDiscussions => "resolve_all_discussions",
            EventKind::ApproveMergeRequest => "approve_merge_request",
            EventKind::UnapproveMergeRequest => "unapprove_merge_request",
            EventKind::EnableAutomaticMergeOnPipelineSuccess => "enable_automatic_merge_on_pipeline_success",
            EventKind::EnableAutomaticMergeOnBuildSuccess => "enable_automatic_merge_on_build_success",
            EventKind::AbortAutomaticMerge => "abort_automatic_merge",
            EventKind::CancelAutomaticMerge => "cancel_automatic_merge",
            EventKind::CreateIssueFromDiscussion => "create_issue_from_discussion",
            EventKind::StartMergeTrain => "start_merge_train",
            EventKind::RemoveFromMergeTrain => "remove_from_merge_train",
            EventKind::EnableAutomaticAddToMergeTrain => "enable_automatic_add_to_merge_train",
            EventKind::AddNote => "add_note",
            EventKind::AddComment => "add_comment",
            EventKind::ChangedLines => "changed_lines",
            EventKind::AwardEmoji => "award_emoji",
            EventKind::Unclassified => "unclassified",
        }
    }

    /// Whether the kind comes from a structured record rather than note text
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            EventKind::AddLabel | EventKind::RemoveLabel | EventKind::AwardEmoji
        )
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown event kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = EventKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EventKind::ALL.len());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("add_label".parse::<EventKind>(), Ok(EventKind::AddLabel));
        assert_eq!("unclassified".parse::<EventKind>(), Ok(EventKind::Unclassified));
        assert_eq!("changed_lines".parse::<EventKind>(), Ok(EventKind::ChangedLines));
        assert!("renamed_the_moon".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        let json = serde_json::to_string(&EventKind::MentionInExternalMergeRequest).unwrap();
        assert_eq!(json, "\"mention_in_external_merge_request\"");
    }
}
