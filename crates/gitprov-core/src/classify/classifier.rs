//! First-match system note classifier

use std::collections::BTreeMap;

use gitprov_model::EventKind;

use super::rules::{Rule, IMPORT_STATEMENT, RULES};
use super::ClassifiedEvent;

// GitLab time tracking units
const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 8 * HOUR;
const WEEK: i64 = 5 * DAY;
const MONTH: i64 = 4 * WEEK;

/// Classifies system note text against an ordered rule table
#[derive(Debug, Clone)]
pub struct EventClassifier {
    rules: Vec<Rule>,
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self {
            rules: RULES.clone(),
        }
    }
}

impl EventClassifier {
    /// Classifier over the built-in rule table
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier over a custom rule table, tried in the given order
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classify one system note.
    ///
    /// Never fails: text no rule matches becomes an `unclassified` event
    /// carrying the raw text verbatim under `raw`.
    pub fn classify(&self, text: &str) -> ClassifiedEvent {
        let mut body = text.trim().to_string();
        let mut pre_import_author = None;
        for pattern in IMPORT_STATEMENT.iter() {
            if let Some(captures) = pattern.captures(&body) {
                pre_import_author = captures
                    .name("pre_import_author")
                    .map(|m| m.as_str().to_string());
                body = pattern.replace(&body, "").trim().to_string();
                break;
            }
        }

        let matched = self
            .rules
            .iter()
            .find_map(|rule| rule.apply(&body).map(|attributes| (rule.kind(), attributes)));
        let mut event = match matched {
            Some((kind, attributes)) => ClassifiedEvent { kind, attributes },
            None => {
                tracing::debug!("No rule matches note {:?}", text);
                ClassifiedEvent::new(EventKind::Unclassified).with_attribute("raw", text)
            }
        };

        if let Some(author) = pre_import_author {
            event.attributes.insert("pre_import_author".to_string(), author);
        }
        if let Some(seconds) = duration_seconds(event.kind, &event.attributes) {
            event
                .attributes
                .insert("duration_seconds".to_string(), seconds.to_string());
        }
        event
    }
}

/// Total duration of a time tracking event in seconds, negative for
/// subtracted time
fn duration_seconds(kind: EventKind, attributes: &BTreeMap<String, String>) -> Option<i64> {
    let sign = match kind {
        EventKind::AddSpentTime | EventKind::ChangeTimeEstimate => 1,
        EventKind::SubtractSpentTime => -1,
        _ => return None,
    };
    let units = [
        ("months", MONTH),
        ("weeks", WEEK),
        ("days", DAY),
        ("hours", HOUR),
        ("minutes", MINUTE),
        ("seconds", 1),
    ];
    let mut total: Option<i64> = None;
    for (key, factor) in units {
        if let Some(amount) = attributes.get(key).and_then(|v| v.parse::<i64>().ok()) {
            let seconds = amount.checked_mul(factor)?;
            total = Some(total.unwrap_or(0).checked_add(seconds)?);
        }
    }
    total?.checked_mul(sign)
}
