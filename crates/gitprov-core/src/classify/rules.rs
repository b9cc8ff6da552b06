//! The ordered system note rule table
//!
//! Rules are tried top to bottom and the first rule with a matching pattern
//! wins; inside a rule the first matching pattern wins. More specific
//! phrasings therefore come before the general ones they overlap with (the
//! two-user review request before the single-user one, a numeric milestone
//! before a named one). Every rule lists example phrasings, and the test suite
//! checks that each example still lands on its own rule.
//!
//! Patterns match case-insensitively against the trimmed note text; captures
//! keep the case the note was written in.

use std::collections::BTreeMap;

use gitprov_model::EventKind;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// One classification rule: an event kind and the phrasings that produce it
#[derive(Debug, Clone)]
pub struct Rule {
    kind: EventKind,
    patterns: Vec<Regex>,
    examples: Vec<String>,
}

impl Rule {
    /// Compile a rule from pattern sources, matched case-insensitively
    pub fn new(kind: EventKind, patterns: &[&str]) -> Result<Self, regex::Error> {
        Ok(Self {
            kind,
            patterns: patterns
                .iter()
                .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
                .collect::<Result<_, _>>()?,
            examples: Vec::new(),
        })
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Named captures of the first matching pattern, or `None` if no
    /// pattern matches. Groups that did not participate are left out.
    pub fn apply(&self, text: &str) -> Option<BTreeMap<String, String>> {
        self.patterns.iter().find_map(|pattern| {
            let captures = pattern.captures(text)?;
            Some(
                pattern
                    .capture_names()
                    .flatten()
                    .filter_map(|name| {
                        captures
                            .name(name)
                            .map(|m| (name.to_string(), m.as_str().to_string()))
                    })
                    .collect(),
            )
        })
    }
}

fn rule(kind: EventKind, patterns: &[&str], examples: &[&str]) -> Rule {
    examples.iter().fold(
        Rule::new(kind, patterns).unwrap(),
        |rule, example| rule.with_example(*example),
    )
}

lazy_static! {
    /// Trailer GitLab appends to notes of imported projects
    pub static ref IMPORT_STATEMENT: Vec<Regex> = vec![
        Regex::new(r"(?i)\*by (?P<pre_import_author>.+) on \d{4}-\d{2}-\d{2}t\d{2}:\d{2}:\d{2} \(imported from gitlab project\)\*").unwrap(),
        Regex::new(r"(?i)\*by (?P<pre_import_author>.+) on \d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}\sutc \(imported from gitlab project\)\*").unwrap(),
    ];

    /// The default rule table
    pub static ref RULES: Vec<Rule> = vec![
        rule(
            EventKind::ChangeTargetBranch,
            &[r"^changed target branch from `(?P<old_target_branch>.+)` to `(?P<new_target_branch>.+)`$"],
            &["changed target branch from `develop` to `main`"],
        ),
        rule(
            EventKind::ChangeEpic,
            &[
                r"^changed epic to &(?P<epic_iid>\d+)$",
                r"^changed epic to &(?P<epic_name>.+)$",
                r"^changed epic to (?P<project_slug>.+)&(?P<epic_iid>\d+)$",
                r"^changed epic to (?P<project_slug>.+)&(?P<epic_name>.+)$",
            ],
            &["changed epic to &12", "changed epic to group/app&7"],
        ),
        rule(
            EventKind::AddToEpic,
            &[
                r"^added to epic &(?P<epic_iid>\d+)$",
                r"^added to epic &(?P<epic_name>.+)$",
            ],
            &["added to epic &3"],
        ),
        rule(
            EventKind::RemoveFromEpic,
            &[
                r"^removed from epic &(?P<epic_iid>\d+)$",
                r"^removed from epic &(?P<epic_name>.+)$",
            ],
            &["removed from epic &3"],
        ),
        rule(
            EventKind::AddToExternalEpic,
            &[
                r"^added to epic (?P<project_slug>.+)&(?P<epic_iid>\d+)$",
                r"^added to epic (?P<project_slug>.+)&(?P<epic_name>.+)$",
            ],
            &["added to epic group/other&4"],
        ),
        rule(
            EventKind::RemoveFromExternalEpic,
            &[
                r"^removed from epic (?P<project_slug>.+)&(?P<epic_iid>\d+)$",
                r"^removed from epic (?P<project_slug>.+)&(?P<epic_name>.+)$",
            ],
            &["removed from epic group/other&4"],
        ),
        rule(
            EventKind::CloseByExternalCommit,
            &[r"^closed via commit (?P<project_slug>.+)@(?P<commit_sha>[0-9a-z]+)$"],
            &["closed via commit group/app@4f2a9c1e"],
        ),
        rule(
            EventKind::CloseByExternalMergeRequest,
            &[r"^closed? via merge request (?P<project_slug>.+?)!(?P<merge_request_iid>\d+)$"],
            &["closed via merge request group/app!12"],
        ),
        rule(
            EventKind::CloseByMergeRequest,
            &[
                r"^closed via merge request !(?P<merge_request_iid>.+)$",
                r"^status changed to closed by merge request !(?P<merge_request_iid>.+)$",
            ],
            &[
                "closed via merge request !12",
                "status changed to closed by merge request !12",
            ],
        ),
        rule(
            EventKind::CloseByCommit,
            &[
                r"^closed via commit (?P<commit_sha>[a-z0-9]+)$",
                r"^status changed to closed by commit (?P<commit_sha>[a-z0-9]+)$",
            ],
            &[
                "closed via commit 4f2a9c1e",
                "status changed to closed by commit 4f2a9c1e",
            ],
        ),
        rule(
            EventKind::RestoreSourceBranch,
            &[r"^restored source branch `(?P<branch_name>.+)`$"],
            &["restored source branch `feature`"],
        ),
        rule(
            EventKind::RemoveLabel,
            &[
                r"^removed ~(?P<label_id>\d+) label$",
                r#"^removed ~"(?P<label>[^"]+)" label$"#,
                r"^removed ~(?P<label>\S+) label$",
                r"^removed (?P<labels>~\S+(?: ~\S+)+) labels$",
                r"^removed label ~?(?P<label>.+)$",
            ],
            &[
                "removed ~4 label",
                "removed ~bug label",
                r#"removed ~"needs review" label"#,
                "removed ~bug ~ui labels",
                "removed label bug",
            ],
        ),
        rule(
            EventKind::AddLabel,
            &[
                r"^added ~(?P<label_id>\d+) label$",
                r#"^added ~"(?P<label>[^"]+)" label$"#,
                r"^added ~(?P<label>\S+) label$",
                r"^added (?P<labels>~\S+(?: ~\S+)+) labels$",
                r"^added label ~?(?P<label>.+)$",
            ],
            &[
                "added ~4 label",
                "added ~bug label",
                r#"added ~"needs review" label"#,
                "added ~bug ~ui labels",
                "added label bug",
            ],
        ),
        rule(
            EventKind::CreateBranch,
            &[r"^created branch \[`(?P<branch_name>.+)`\]\((?P<compare_link>.+)\).*$"],
            &["created branch [`fix-123`](https://gitlab.example.org/group/app/-/compare/main...fix-123) to address this issue"],
        ),
        rule(
            EventKind::MarkTaskAsIncomplete,
            &[r"^marked the task [*]{2}(?P<task_description>.+)[*]{2} as incomplete$"],
            &["marked the task **write docs** as incomplete"],
        ),
        rule(
            EventKind::MarkTaskAsDone,
            &[r"^marked the task [*]{2}(?P<task_description>.+)[*]{2} as completed$"],
            &["marked the task **write docs** as completed"],
        ),
        rule(
            EventKind::AddCommits,
            &[
                r"added (?P<number_of_commits>\d+)\scommits?\n\n.+(?P<short_sha>[a-z0-9]{8}) - (?P<title>.+?)<.*",
                r"^added (?P<number_of_commits>\d+) new commits?:\n\n(\* (?P<short_sha>[a-z0-9]{8}) - (?P<title>.+?)\n)+$",
                r"^added (?P<number_of_commits>\d+) new commits?:\n\n(\* (?P<short_sha>[a-z0-9]{11}) - (?P<title>.+?)\n)+$",
                r"^added (?P<number_of_commits>\d+) (?:new )?commits?(?:.*\n?)*$",
            ],
            &[
                "added 1 commit\n\n<ul><li>4f2a9c1e - fix parser</li></ul>",
                "added 2 new commits:\n\n* 4f2a9c1e - fix parser\n* 9b8c7d6e - add tests",
                "added 3 commits",
            ],
        ),
        rule(
            EventKind::AddressInMergeRequest,
            &[r"^created merge request !(?P<merge_request_iid>\d+) to address this issue$"],
            &["created merge request !5 to address this issue"],
        ),
        rule(
            EventKind::UnmarkAsWorkInProgress,
            &[
                r"^unmarked as a [*]{2}work in progress[*]{2}$",
                r"^unmarked this merge request as a work in progress$",
            ],
            &[
                "unmarked as a **work in progress**",
                "unmarked this merge request as a work in progress",
            ],
        ),
        rule(
            EventKind::MarkAsWorkInProgress,
            &[
                r"^marked as a [*]{2}work in progress[*]{2}$",
                r"^marked this merge request as a [*]{2}work in progress[*]{2}$",
            ],
            &[
                "marked as a **work in progress**",
                "marked this merge request as a **work in progress**",
            ],
        ),
        rule(
            EventKind::Merge,
            &[r"^merged$", r"^status changed to merged$"],
            &["merged", "status changed to merged"],
        ),
        rule(
            EventKind::ChangeDescription,
            &[r"^changed the description$"],
            &["changed the description"],
        ),
        rule(
            EventKind::ChangeTitle,
            &[
                r"^changed title from [*]{2}(?P<old_title>.+)[*]{2} to [*]{2}(?P<new_title>.+)[*]{2}$",
                r"^changed title: [*]{2}(?P<old_title>.+)[*]{2} → [*]{2}(?P<new_title>.+)[*]{2}$",
                r"^title changed from [*]{2}(?P<old_title>.+)[*]{2} to [*]{2}(?P<new_title>.+)[*]{2}$",
            ],
            &[
                "changed title from **Parser bug** to **Fix parser**",
                "changed title: **parser bug** → **fix parser**",
                "title changed from **parser bug** to **fix parser**",
            ],
        ),
        rule(
            EventKind::MoveFrom,
            &[r"^moved from (?P<project_slug>.*?)#(?P<issue_iid>\d+)$"],
            &["moved from group/old#12"],
        ),
        rule(
            EventKind::MoveTo,
            &[r"^moved to (?P<project_slug>.*?)#(?P<issue_iid>\d+)$"],
            &["moved to group/new#3"],
        ),
        rule(
            EventKind::Reopen,
            &[r"^reopened$", r"^status changed to reopened$"],
            &["reopened", "status changed to reopened"],
        ),
        rule(
            EventKind::Close,
            &[r"^closed$", r"^status changed to closed$"],
            &["closed", "status changed to closed"],
        ),
        rule(
            EventKind::UnrelateFromExternalIssue,
            &[r"^removed the relation with (?P<project_slug>.+)#(?P<issue_iid>\d+)$"],
            &["removed the relation with group/other#4"],
        ),
        rule(
            EventKind::RelateToExternalIssue,
            &[r"^marked this issue as related to (?P<project_slug>.+)#(?P<issue_iid>\d+)$"],
            &["marked this issue as related to group/other#4"],
        ),
        rule(
            EventKind::UnrelateFromIssue,
            &[r"^removed the relation with #(?P<issue_iid>\d+)$"],
            &["removed the relation with #4"],
        ),
        rule(
            EventKind::RelateToIssue,
            &[r"^marked this issue as related to #(?P<issue_iid>\d+)$"],
            &["marked this issue as related to #4"],
        ),
        rule(
            EventKind::HasDuplicate,
            &[r"^marked #(?P<issue_iid>\d+) as a duplicate of this issue$"],
            &["marked #9 as a duplicate of this issue"],
        ),
        rule(
            EventKind::MarkAsDuplicate,
            &[r"^marked this issue as a duplicate of #(?P<issue_iid>\d+)$"],
            &["marked this issue as a duplicate of #9"],
        ),
        rule(
            EventKind::MakeVisible,
            &[r"^made the issue visible to everyone$", r"^made the issue visible$"],
            &["made the issue visible to everyone", "made the issue visible"],
        ),
        rule(
            EventKind::MakeConfidential,
            &[r"^made the issue confidential$"],
            &["made the issue confidential"],
        ),
        rule(
            EventKind::RemoveWeight,
            &[r"^removed the weight$"],
            &["removed the weight"],
        ),
        rule(
            EventKind::ChangeWeight,
            &[r"^changed weight to [*]{2}(?P<weight>\d+)[*]{2}$"],
            &["changed weight to **3**"],
        ),
        rule(
            EventKind::RemoveDueDate,
            &[r"^removed due date$"],
            &["removed due date"],
        ),
        rule(
            EventKind::ChangeDueDate,
            &[r"^changed due date to (?P<month>january|february|march|april|may|june|july|august|september|october|november|december) (?P<day>\d\d), (?P<year>\d{4})$"],
            &["changed due date to March 05, 2024"],
        ),
        rule(
            EventKind::RemoveTimeEstimate,
            &[r"^removed time estimate$"],
            &["removed time estimate"],
        ),
        rule(
            EventKind::ChangeTimeEstimate,
            &[concat!(
                r"^changed time estimate to",
                r"(?:\s(?P<months>-?\d+)mo)?",
                r"(?:\s(?P<weeks>-?\d+)w)?",
                r"(?:\s(?P<days>-?\d+)d)?",
                r"(?:\s(?P<hours>-?\d+)h)?",
                r"(?:\s(?P<minutes>-?\d+)m)?",
                r"(?:\s(?P<seconds>-?\d+)s)?$",
            )],
            &["changed time estimate to 1w 2d 4h"],
        ),
        rule(
            EventKind::UnlockMergeRequest,
            &[r"^unlocked this merge request$"],
            &["unlocked this merge request"],
        ),
        rule(
            EventKind::LockMergeRequest,
            &[r"^locked this merge request$"],
            &["locked this merge request"],
        ),
        rule(
            EventKind::UnlockIssue,
            &[r"^unlocked this issue$"],
            &["unlocked this issue"],
        ),
        rule(
            EventKind::LockIssue,
            &[r"^locked this issue$"],
            &["locked this issue"],
        ),
        rule(
            EventKind::RemoveSpentTime,
            &[r"^removed time spent$"],
            &["removed time spent"],
        ),
        rule(
            EventKind::SubtractSpentTime,
            &[concat!(
                r"^subtracted",
                r"(?:\s(?P<months>\d+)mo)?",
                r"(?:\s(?P<weeks>\d+)w)?",
                r"(?:\s(?P<days>\d+)d)?",
                r"(?:\s(?P<hours>\d+)h)?",
                r"(?:\s(?P<minutes>\d+)m)?",
                r"\sof time spent at (?P<date>\d{4}-\d{2}-\d{2})$",
            )],
            &["subtracted 1h 30m of time spent at 2024-03-05"],
        ),
        rule(
            EventKind::AddSpentTime,
            &[concat!(
                r"^added",
                r"(?:\s(?P<months>\d+)mo)?",
                r"(?:\s(?P<weeks>\d+)w)?",
                r"(?:\s(?P<days>\d+)d)?",
                r"(?:\s(?P<hours>\d+)h)?",
                r"(?:\s(?P<minutes>\d+)m)?",
                r"\sof time spent at (?P<date>\d{4}-\d{2}-\d{2})$",
            )],
            &["added 2h of time spent at 2024-03-05"],
        ),
        rule(
            EventKind::RemoveMilestone,
            &[r"^removed milestone$", r"^milestone removed$"],
            &["removed milestone", "milestone removed"],
        ),
        rule(
            EventKind::ChangeMilestone,
            &[
                r"^changed milestone to %(?P<milestone_iid>\d+)$",
                r"^changed milestone to %(?P<milestone_name>.+)$",
                r"^changed milestone to (?P<project_slug>.+)%(?P<milestone_iid>\d+)$",
                r"^changed milestone to (?P<project_slug>.+)%(?P<milestone_name>.+)$",
                r"^milestone changed to %(?P<milestone_iid>\d+)$",
                r"^milestone changed to \[(?P<release_name>.+)\]\((?P<release_link>.+)\)$",
                r"^milestone changed to (?P<release_name>.+)$",
            ],
            &[
                "changed milestone to %4",
                "changed milestone to %v1.0",
                "changed milestone to group/app%4",
                "milestone changed to %4",
                "milestone changed to [v1.0](https://gitlab.example.org/group/app/-/milestones/1)",
                "milestone changed to v1.0",
            ],
        ),
        rule(
            EventKind::UnassignUser,
            &[r"^unassigned @(?P<user_name>.*)$", r"^removed assignee$"],
            &["unassigned @ada", "removed assignee"],
        ),
        rule(
            EventKind::AssignUser,
            &[r"^assigned to @(?P<user_name>.*)$"],
            &["assigned to @ada"],
        ),
        rule(
            EventKind::ReassignUser,
            &[r"^reassigned to @(?P<user_name>.*)$"],
            &["reassigned to @grace"],
        ),
        rule(
            EventKind::RequestReview,
            &[
                r"^requested review from @(?P<user_name>.*) and @(?P<user_name2>.*)$",
                r"^requested review from @(?P<user_name>.*)$",
            ],
            &["requested review from @ada and @grace", "requested review from @ada"],
        ),
        rule(
            EventKind::CancelReviewRequest,
            &[r"^removed review request for @(?P<user_name>.*)$"],
            &["removed review request for @ada"],
        ),
        rule(
            EventKind::MentionInExternalMergeRequest,
            &[r"^mentioned in merge request (?P<project_slug>.+)!(?P<merge_request_iid>\d+)$"],
            &["mentioned in merge request group/other!7"],
        ),
        rule(
            EventKind::MentionInMergeRequest,
            &[r"^mentioned in merge request !(?P<merge_request_iid>\d+)$"],
            &["mentioned in merge request !7"],
        ),
        rule(
            EventKind::MentionInExternalCommit,
            &[r"^mentioned in commit (?P<project_slug>.+)@(?P<commit_sha>[0-9a-z]{40})$"],
            &["mentioned in commit group/other@4f2a9c1e4f2a9c1e4f2a9c1e4f2a9c1e4f2a9c1e"],
        ),
        rule(
            EventKind::MentionInCommit,
            &[r"^mentioned in commit (?P<commit_sha>[0-9a-z]{40})$"],
            &["mentioned in commit 4f2a9c1e4f2a9c1e4f2a9c1e4f2a9c1e4f2a9c1e"],
        ),
        rule(
            EventKind::MentionInExternalIssue,
            &[r"^mentioned in issue (?P<project_slug>.+)#(?P<issue_iid>\d+)$"],
            &["mentioned in issue group/other#8"],
        ),
        rule(
            EventKind::MentionInIssue,
            &[r"^mentioned in issue #(?P<issue_iid>\d+)$"],
            &["mentioned in issue #8"],
        ),
        rule(
            EventKind::MentionInEpic,
            &[r"^mentioned in epic &(?P<noteable_iid>\d+)$"],
            &["mentioned in epic &2"],
        ),
        rule(
            EventKind::ResolveThreads,
            &[r"^resolved all threads$"],
            &["resolved all threads"],
        ),
        rule(
            EventKind::ResolveAllDiscussions,
            &[r"^resolved all discussions$"],
            &["resolved all discussions"],
        ),
        rule(
            EventKind::ApproveMergeRequest,
            &[r"^approved this merge request$"],
            &["approved this merge request"],
        ),
        rule(
            EventKind::UnapproveMergeRequest,
            &[r"^unapproved this merge request$"],
            &["unapproved this merge request"],
        ),
        rule(
            EventKind::EnableAutomaticMergeOnPipelineSuccess,
            &[r"^enabled an automatic merge when the pipeline for (?P<pipeline_commit_sha>[0-9a-z]+) succeeds$"],
            &["enabled an automatic merge when the pipeline for 4f2a9c1e succeeds"],
        ),
        rule(
            EventKind::EnableAutomaticMergeOnBuildSuccess,
            &[r"^enabled an automatic merge when the build for (?P<commit_sha>[0-9a-z]+) succeeds$"],
            &["enabled an automatic merge when the build for 4f2a9c1e succeeds"],
        ),
        rule(
            EventKind::AbortAutomaticMerge,
            &[r"^aborted the automatic merge because (?P<abort_reason>[a-z\s]+)$"],
            &["aborted the automatic merge because the source branch was updated"],
        ),
        rule(
            EventKind::CancelAutomaticMerge,
            &[r"^canceled the automatic merge$"],
            &["canceled the automatic merge"],
        ),
        rule(
            EventKind::CreateIssueFromDiscussion,
            &[r"^created #(?P<issue_iid>\d+) to continue this discussion$"],
            &["created #14 to continue this discussion"],
        ),
        rule(
            EventKind::MarkMergeRequestReady,
            &[r"^marked this merge request as \*\*ready\*\*$"],
            &["marked this merge request as **ready**"],
        ),
        rule(
            EventKind::MarkMergeRequestDraft,
            &[r"^marked this merge request as \*\*draft\*\*$"],
            &["marked this merge request as **draft**"],
        ),
        rule(
            EventKind::StartMergeTrain,
            &[r"^started a merge train$"],
            &["started a merge train"],
        ),
        rule(
            EventKind::RemoveFromMergeTrain,
            &[r"^removed this merge request from the merge train because (?P<reason>.+?)\.?$"],
            &["removed this merge request from the merge train because no stages / jobs for this pipeline."],
        ),
        rule(
            EventKind::EnableAutomaticAddToMergeTrain,
            &[r"^enabled automatic add to merge train when the pipeline for (?P<pipeline_commit_sha>[0-9a-z]+) succeeds$"],
            &["enabled automatic add to merge train when the pipeline for 4f2a9c1e succeeds"],
        ),
    ];
}
