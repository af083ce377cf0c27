//! Alert predicates: preset-level filter, free-form option filter, and
//! their conjunction. All pure; nothing here touches the alert list.

use crate::constants::{OPTION_VALUE_SEPARATOR, PRESET_DELETED, PRESET_FEED, PRESET_GROUPS};
use crate::models::{Alert, FieldValue, FilterOption};

/// Does `alert` belong in the view named `preset_name`?
pub fn preset_matches(alert: &Alert, preset_name: &str) -> bool {
    match preset_name {
        PRESET_DELETED => alert.deleted,
        PRESET_GROUPS => alert.group,
        PRESET_FEED => !alert.deleted,
        _ => true,
    }
}

/// Does `alert` satisfy every option? Options that cannot filter
/// (malformed, unknown field, flag or timestamp field) are satisfied.
pub fn options_match(alert: &Alert, options: &[FilterOption]) -> bool {
    options.iter().all(|option| option_matches(alert, option))
}

/// Preset and options together.
pub fn matches(alert: &Alert, options: &[FilterOption], preset_name: &str) -> bool {
    preset_matches(alert, preset_name) && options_match(alert, options)
}

fn option_matches(alert: &Alert, option: &FilterOption) -> bool {
    let Some((key, value)) = option.criterion() else {
        return true;
    };
    match alert.field(&key) {
        Some(field) => value_matches(&field, &value),
        None => true,
    }
}

/// `value` is already lowercased.
pub(crate) fn value_matches(field: &FieldValue<'_>, value: &str) -> bool {
    match field {
        FieldValue::List(items) => {
            let allowed: Vec<&str> = value.split(OPTION_VALUE_SEPARATOR).collect();
            items.iter().all(|item| match item {
                Some(s) => allowed.contains(&s.to_lowercase().as_str()),
                None => false,
            })
        }
        FieldValue::Text(s) => s.to_lowercase().contains(value),
        FieldValue::Other => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn make_alert(deleted: bool, group: bool) -> Alert {
        let mut a = Alert::new("a1", "disk full", Utc.timestamp_opt(0, 0).unwrap());
        a.deleted = deleted;
        a.group = group;
        a
    }

    fn opts(values: &[&str]) -> Vec<FilterOption> {
        values.iter().map(|v| FilterOption::new(*v)).collect()
    }

    // ── preset_matches ────────────────────────────────────────────

    #[test]
    fn deleted_preset_requires_deleted_flag() {
        for (deleted, group) in [(true, true), (true, false), (false, true), (false, false)] {
            let a = make_alert(deleted, group);
            assert_eq!(preset_matches(&a, "Deleted"), deleted);
        }
    }

    #[test]
    fn groups_preset_requires_group_flag() {
        for (deleted, group) in [(true, true), (true, false), (false, true), (false, false)] {
            let a = make_alert(deleted, group);
            assert_eq!(preset_matches(&a, "Groups"), group);
        }
    }

    #[test]
    fn feed_preset_requires_not_deleted() {
        for (deleted, group) in [(true, true), (true, false), (false, true), (false, false)] {
            let a = make_alert(deleted, group);
            assert_eq!(preset_matches(&a, "Feed"), !deleted);
        }
    }

    #[test]
    fn other_presets_pass_everything() {
        for (deleted, group) in [(true, true), (false, false)] {
            let a = make_alert(deleted, group);
            assert!(preset_matches(&a, "Critical"));
            assert!(preset_matches(&a, ""));
            // Names are case-sensitive
            assert!(preset_matches(&a, "feed"));
        }
    }

    // ── options_match ─────────────────────────────────────────────

    #[test]
    fn list_field_every_item_must_be_allowed() {
        let mut a = make_alert(false, false);
        a.extra.insert("severities".into(), json!(["high"]));
        assert!(options_match(&a, &opts(&["severities=high,low"])));

        a.extra.insert("severities".into(), json!(["high", "critical"]));
        assert!(!options_match(&a, &opts(&["severities=high,low"])));
    }

    #[test]
    fn list_value_matching_on_raw_field() {
        let high = FieldValue::List(vec![Some("high")]);
        let mixed = FieldValue::List(vec![Some("high"), Some("critical")]);
        assert!(value_matches(&high, "high,low"));
        assert!(!value_matches(&mixed, "high,low"));
        assert!(value_matches(&FieldValue::List(vec![]), "high"));
        assert!(!value_matches(&FieldValue::List(vec![None]), "high"));
    }

    #[test]
    fn known_list_field_source() {
        let mut a = make_alert(false, false);
        a.source = vec!["Grafana".into(), "prometheus".into()];
        assert!(options_match(&a, &opts(&["source=grafana,prometheus,datadog"])));
        assert!(!options_match(&a, &opts(&["source=grafana"])));
    }

    #[test]
    fn list_items_match_whole_values_only() {
        let mut a = make_alert(false, false);
        a.source = vec!["grafana".into()];
        assert!(!options_match(&a, &opts(&["source=graf"])));
    }

    #[test]
    fn string_field_case_insensitive_substring() {
        let a: Alert = serde_json::from_value(json!({
            "id": "a1",
            "status": "Open-Ticket",
            "lastReceived": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert!(options_match(&a, &opts(&["status=open"])));
        assert!(options_match(&a, &opts(&["STATUS=TICKET"])));
        assert!(!options_match(&a, &opts(&["status=closed"])));
    }

    #[test]
    fn unknown_severity_matches_its_raw_text() {
        let a: Alert = serde_json::from_value(json!({
            "id": "a1",
            "severity": "error",
            "lastReceived": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert!(options_match(&a, &opts(&["severity=err"])));
        assert!(!options_match(&a, &opts(&["severity=info"])));
    }

    #[test]
    fn typed_string_fields_match() {
        let a = make_alert(false, false);
        assert!(options_match(&a, &opts(&["name=DISK"])));
        assert!(options_match(&a, &opts(&["status=fir"])));
        assert!(!options_match(&a, &opts(&["severity=critical"])));
    }

    #[test]
    fn malformed_options_do_not_filter() {
        let a = make_alert(false, false);
        assert!(options_match(&a, &opts(&["name"])));
        assert!(options_match(&a, &opts(&["=disk"])));
        assert!(options_match(&a, &opts(&["name="])));
        assert!(options_match(&a, &opts(&[""])));
    }

    #[test]
    fn absent_or_untyped_fields_do_not_filter() {
        let mut a = make_alert(false, false);
        a.extra.insert("count".into(), json!(5));
        assert!(options_match(&a, &opts(&["nosuchfield=x"])));
        assert!(options_match(&a, &opts(&["deleted=true"])));
        assert!(options_match(&a, &opts(&["count=7"])));
        assert!(options_match(&a, &opts(&["service=api"])));
    }

    #[test]
    fn key_lookup_uses_lowercased_key() {
        let mut a = make_alert(false, false);
        a.extra.insert("Team".into(), json!("infra"));
        // "Team" is never reachable: the key is lowercased before lookup
        assert!(options_match(&a, &opts(&["Team=payments"])));
        a.extra.insert("team".into(), json!("infra"));
        assert!(!options_match(&a, &opts(&["Team=payments"])));
    }

    #[test]
    fn options_combine_with_and() {
        let mut a = make_alert(false, false);
        a.environment = "production".into();
        assert!(options_match(&a, &opts(&["name=disk", "environment=prod"])));
        assert!(!options_match(&a, &opts(&["name=disk", "environment=staging"])));
    }

    #[test]
    fn empty_options_always_match() {
        assert!(options_match(&make_alert(true, true), &[]));
    }

    // ── matches ───────────────────────────────────────────────────

    #[test]
    fn combined_with_no_options_equals_preset_alone() {
        for (deleted, group) in [(true, true), (true, false), (false, true), (false, false)] {
            let a = make_alert(deleted, group);
            for preset in ["Feed", "Deleted", "Groups", "Custom"] {
                assert_eq!(matches(&a, &[], preset), preset_matches(&a, preset));
            }
        }
    }

    #[test]
    fn combined_requires_both() {
        let a = make_alert(true, false);
        assert!(!matches(&a, &opts(&["name=disk"]), "Feed"));
        assert!(matches(&a, &opts(&["name=disk"]), "Deleted"));
        assert!(!matches(&a, &opts(&["name=cpu"]), "Deleted"));
    }
}
