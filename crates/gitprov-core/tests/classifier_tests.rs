//! System note classifier integration tests

use gitprov_core::{EventClassifier, Rule};
use gitprov_model::EventKind;
use proptest::prelude::*;

#[test]
fn test_rule_table_covers_text_kinds() {
    let classifier = EventClassifier::new();
    let covered: std::collections::BTreeSet<_> =
        classifier.rules().iter().map(Rule::kind).collect();
    for kind in EventKind::ALL.iter() {
        let structured = matches!(
            kind,
            EventKind::AddNote
                | EventKind::AddComment
                | EventKind::ChangedLines
                | EventKind::AwardEmoji
                | EventKind::Unclassified
        );
        assert_eq!(
            covered.contains(kind),
            !structured,
            "rule table coverage of {}",
            kind
        );
    }
}

#[test]
fn test_time_tracking_durations() {
    let classifier = EventClassifier::new();

    let spent = classifier.classify("added 1w 2d of time spent at 2024-03-05");
    assert_eq!(spent.kind, EventKind::AddSpentTime);
    assert_eq!(spent.attribute("weeks"), Some("1"));
    assert_eq!(spent.attribute("date"), Some("2024-03-05"));
    assert_eq!(spent.attribute("duration_seconds"), Some("201600"));

    let subtracted = classifier.classify("subtracted 1h 30m of time spent at 2024-03-05");
    assert_eq!(subtracted.kind, EventKind::SubtractSpentTime);
    assert_eq!(subtracted.attribute("duration_seconds"), Some("-5400"));
}

#[test]
fn test_imported_note() {
    let event = EventClassifier::new()
        .classify("Closed *By Grace Hopper on 2019-03-01 10:20:30 UTC (imported from GitLab project)*");
    assert_eq!(event.kind, EventKind::Close);
    assert_eq!(event.attribute("pre_import_author"), Some("Grace Hopper"));
}

#[test]
fn test_captures_are_extracted() {
    let classifier = EventClassifier::new();

    let title = classifier.classify("changed title from **Crash** to **Crash on empty input**");
    assert_eq!(title.kind, EventKind::ChangeTitle);
    assert_eq!(title.attribute("old_title"), Some("Crash"));
    assert_eq!(title.attribute("new_title"), Some("Crash on empty input"));

    let external = classifier.classify("closed via merge request group/app!12");
    assert_eq!(external.kind, EventKind::CloseByExternalMergeRequest);
    assert_eq!(external.attribute("project_slug"), Some("group/app"));
    assert_eq!(external.attribute("merge_request_iid"), Some("12"));
}

#[test]
fn test_custom_rule_table() {
    let rules = vec![Rule::new(EventKind::Close, &[r"^shipped$"]).unwrap()];
    let classifier = EventClassifier::with_rules(rules);
    assert_eq!(classifier.classify("Shipped").kind, EventKind::Close);
    assert!(classifier.classify("closed").is_unclassified());
}

proptest! {
    #[test]
    fn test_classification_ignores_case_and_padding(text in "[a-z0-9 @~!#%]{0,40}") {
        let classifier = EventClassifier::new();
        let plain = classifier.classify(&text);
        let shouted = classifier.classify(&format!("  {}\n", text.to_uppercase()));
        prop_assert_eq!(plain.kind, shouted.kind);
    }

    #[test]
    fn test_label_capture_is_verbatim(label in "[A-Za-z][A-Za-z0-9_-]{0,20}") {
        let event = EventClassifier::new().classify(&format!("added label {}", label));
        prop_assert_eq!(event.kind, EventKind::AddLabel);
        prop_assert_eq!(event.attribute("label"), Some(label.as_str()));
    }

    #[test]
    fn test_time_estimates_never_panic(amount in any::<i64>(), unit in "mo|w|d|h|m|s") {
        let event = EventClassifier::new()
            .classify(&format!("changed time estimate to {}{}", amount, unit));
        prop_assert_eq!(event.kind, EventKind::ChangeTimeEstimate);
    }

    #[test]
    fn test_unclassified_always_keeps_raw(text in "\\PC{0,60}") {
        let event = EventClassifier::new().classify(&text);
        if event.is_unclassified() {
            prop_assert_eq!(event.attribute("raw"), Some(text.as_str()));
        }
    }
}
