//! View composition: which alerts a panel shows, in what order, and with
//! which columns.

use std::cmp::Ordering;

use indexmap::IndexSet;

use crate::models::{Alert, FilterOption, KNOWN_KEYS};

use super::filter;

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertColumn {
    Checkbox,
    Severity,
    Name,
    Description,
    Status,
    LastReceived,
    Source,
    /// Dynamic column for a field outside the known schema.
    Extra(String),
    Menu,
}

impl AlertColumn {
    /// Header label. Extra columns use their field name verbatim.
    pub fn header(&self) -> String {
        match self {
            AlertColumn::Checkbox => "[ ]".to_string(),
            AlertColumn::Severity => t!("column.severity").to_string(),
            AlertColumn::Name => t!("column.name").to_string(),
            AlertColumn::Description => t!("column.description").to_string(),
            AlertColumn::Status => t!("column.status").to_string(),
            AlertColumn::LastReceived => t!("column.last_received").to_string(),
            AlertColumn::Source => t!("column.source").to_string(),
            AlertColumn::Extra(key) => key.clone(),
            AlertColumn::Menu => String::new(),
        }
    }
}

/// Alerts passing the preset and options, most recently received first.
/// Alerts received at the same instant keep their input order.
pub fn filter_and_sort<'a>(
    alerts: &'a [Alert],
    options: &[FilterOption],
    preset_name: &str,
) -> Vec<&'a Alert> {
    let mut view: Vec<&Alert> = alerts
        .iter()
        .filter(|a| filter::matches(a, options, preset_name))
        .collect();
    view.sort_by(|a, b| newest_first(a, b));
    view
}

fn newest_first(a: &Alert, b: &Alert) -> Ordering {
    b.last_received.cmp(&a.last_received)
}

/// Field names outside the known schema across all alerts, in order of
/// first appearance, without duplicates.
pub fn extra_columns(alerts: &[Alert]) -> Vec<String> {
    let keys: IndexSet<&str> = alerts
        .iter()
        .flat_map(|a| a.extra.keys().map(String::as_str))
        .filter(|key| !KNOWN_KEYS.contains(key))
        .collect();
    keys.into_iter().map(str::to_string).collect()
}

/// Column layout for a panel.
pub fn table_columns(extra: &[String], checkbox: bool, menu: bool) -> Vec<AlertColumn> {
    let mut columns = Vec::with_capacity(extra.len() + 8);
    if checkbox {
        columns.push(AlertColumn::Checkbox);
    }
    columns.extend([
        AlertColumn::Severity,
        AlertColumn::Name,
        AlertColumn::Description,
        AlertColumn::Status,
        AlertColumn::LastReceived,
        AlertColumn::Source,
    ]);
    columns.extend(extra.iter().cloned().map(AlertColumn::Extra));
    if menu {
        columns.push(AlertColumn::Menu);
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn make_alert(id: &str, secs: i64) -> Alert {
        Alert::new(id, format!("alert {}", id), Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn ids(view: &[&Alert]) -> Vec<String> {
        view.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn sorted_newest_first() {
        let alerts = vec![make_alert("t1", 10), make_alert("t3", 30), make_alert("t2", 20)];
        let view = filter_and_sort(&alerts, &[], "Feed");
        assert_eq!(ids(&view), vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let alerts = vec![make_alert("a", 10), make_alert("b", 10), make_alert("c", 20)];
        let view = filter_and_sort(&alerts, &[], "Feed");
        assert_eq!(ids(&view), vec!["c", "a", "b"]);
    }

    #[test]
    fn filters_by_preset_and_options() {
        let mut deleted = make_alert("gone", 50);
        deleted.deleted = true;
        let mut db = make_alert("db", 40);
        db.service = Some("postgres".into());
        let alerts = vec![deleted, db, make_alert("web", 30)];

        assert_eq!(ids(&filter_and_sort(&alerts, &[], "Feed")), vec!["db", "web"]);
        assert_eq!(ids(&filter_and_sort(&alerts, &[], "Deleted")), vec!["gone"]);
        assert_eq!(
            ids(&filter_and_sort(&alerts, &[FilterOption::new("service=postgres")], "Feed")),
            vec!["db"]
        );
    }

    #[test]
    fn filtering_leaves_input_untouched() {
        let alerts = vec![make_alert("t1", 10), make_alert("t2", 20)];
        let before = alerts.clone();
        let _ = filter_and_sort(&alerts, &[FilterOption::new("name=alert")], "Feed");
        assert_eq!(alerts, before);
    }

    #[test]
    fn extra_columns_exclude_known_keys() {
        let mut a = make_alert("a", 0);
        a.extra.insert("team".into(), json!("infra"));
        assert_eq!(extra_columns(&[a]), vec!["team"]);
    }

    #[test]
    fn extra_columns_first_appearance_no_duplicates() {
        let mut a = make_alert("a", 0);
        a.extra.insert("team".into(), json!("infra"));
        a.extra.insert("region".into(), json!("eu"));
        let mut b = make_alert("b", 0);
        b.extra.insert("cluster".into(), json!("k1"));
        b.extra.insert("team".into(), json!("web"));
        assert_eq!(extra_columns(&[a, b]), vec!["team", "region", "cluster"]);
    }

    #[test]
    fn extra_columns_ignore_known_names_in_extra_map() {
        let mut a = make_alert("a", 0);
        a.extra.insert("deleted".into(), json!(true));
        a.extra.insert("team".into(), json!("infra"));
        assert_eq!(extra_columns(&[a]), vec!["team"]);
    }

    #[test]
    fn columns_with_checkbox_and_menu() {
        rust_i18n::set_locale("en");
        let cols = table_columns(&["team".to_string()], true, true);
        assert_eq!(cols.first(), Some(&AlertColumn::Checkbox));
        assert_eq!(cols.last(), Some(&AlertColumn::Menu));
        assert!(cols.contains(&AlertColumn::Extra("team".into())));
        assert_eq!(cols.len(), 9);
    }

    #[test]
    fn columns_without_checkbox() {
        let cols = table_columns(&[], false, true);
        assert_eq!(cols.first(), Some(&AlertColumn::Severity));
        assert!(!cols.contains(&AlertColumn::Checkbox));
    }
}
