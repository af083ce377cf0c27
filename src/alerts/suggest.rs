//! Option suggestions for the filter bar, built from the alerts in view.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::constants::{MAX_OPTION_SUGGESTIONS, OPTION_KV_SEPARATOR};
use crate::models::Alert;

/// Distinct lowercased `key=value` strings, sorted.
pub fn option_suggestions(alerts: &[&Alert]) -> Vec<String> {
    let mut out = BTreeSet::new();
    for alert in alerts {
        let mut push = |key: &str, value: &str| {
            if !value.is_empty() {
                out.insert(format!("{}{}{}", key, OPTION_KV_SEPARATOR, value).to_lowercase());
            }
        };

        push("severity", alert.severity.as_str());
        push("status", alert.status.as_str());
        push("environment", &alert.environment);
        push("name", &alert.name);
        if let Some(service) = &alert.service {
            push("service", service);
        }
        if let Some(assignee) = &alert.assignee {
            push("assignee", assignee);
        }
        for source in &alert.source {
            push("source", source);
        }
        for (key, value) in &alert.extra {
            match value {
                Value::String(s) => push(key, s),
                Value::Array(items) => {
                    for s in items.iter().filter_map(Value::as_str) {
                        push(key, s);
                    }
                }
                _ => {}
            }
        }
    }
    out.into_iter().take(MAX_OPTION_SUGGESTIONS).collect()
}

/// First suggestion extending `prefix` (case-insensitive).
pub fn complete<'a>(suggestions: &'a [String], prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let prefix = prefix.to_lowercase();
    suggestions
        .iter()
        .find(|s| s.starts_with(&prefix) && s.len() > prefix.len())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn make_alert() -> Alert {
        let mut a = Alert::new("a1", "Disk Full", Utc.timestamp_opt(0, 0).unwrap());
        a.environment = "prod".into();
        a.source = vec!["grafana".into()];
        a.extra.insert("team".into(), json!("Infra"));
        a.extra.insert("count".into(), json!(3));
        a
    }

    #[test]
    fn suggestions_cover_strings_and_lists() {
        let a = make_alert();
        let s = option_suggestions(&[&a]);
        assert!(s.contains(&"name=disk full".to_string()));
        assert!(s.contains(&"source=grafana".to_string()));
        assert!(s.contains(&"team=infra".to_string()));
        assert!(s.contains(&"severity=info".to_string()));
        assert!(!s.iter().any(|x| x.starts_with("count=")));
    }

    #[test]
    fn suggestions_sorted_and_distinct() {
        let a = make_alert();
        let b = make_alert();
        let s = option_suggestions(&[&a, &b]);
        let mut sorted = s.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(s, sorted);
    }

    #[test]
    fn empty_values_skipped() {
        let a = Alert::new("a1", "", Utc.timestamp_opt(0, 0).unwrap());
        let s = option_suggestions(&[&a]);
        assert!(!s.iter().any(|x| x == "name=" || x == "environment="));
    }

    #[test]
    fn complete_picks_first_longer_match() {
        let s = vec!["severity=high".to_string(), "severity=info".to_string()];
        assert_eq!(complete(&s, "SEV"), Some("severity=high"));
        assert_eq!(complete(&s, "severity=i"), Some("severity=info"));
        assert_eq!(complete(&s, "severity=info"), None);
        assert_eq!(complete(&s, ""), None);
        assert_eq!(complete(&s, "team"), None);
    }
}
