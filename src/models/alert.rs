use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field names with a typed home on [`Alert`]. Anything else an alert
/// carries lands in [`Alert::extra`] and becomes an extra table column.
pub const KNOWN_KEYS: &[&str] = &[
    "id",
    "name",
    "status",
    "severity",
    "lastReceived",
    "environment",
    "service",
    "source",
    "message",
    "description",
    "url",
    "fingerprint",
    "pushed",
    "deleted",
    "group",
    "isDuplicate",
    "duplicateReason",
    "assignee",
];

/// How loud an alert is. Severities outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertSeverity {
    Low,
    #[default]
    Info,
    Warning,
    High,
    Critical,
    Other(String),
}

impl AlertSeverity {
    pub fn as_str(&self) -> &str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
            AlertSeverity::Other(s) => s,
        }
    }
}

impl From<String> for AlertSeverity {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "low" => AlertSeverity::Low,
            "info" => AlertSeverity::Info,
            "warning" => AlertSeverity::Warning,
            "high" => AlertSeverity::High,
            "critical" => AlertSeverity::Critical,
            _ => AlertSeverity::Other(s),
        }
    }
}

impl From<AlertSeverity> for String {
    fn from(severity: AlertSeverity) -> Self {
        match severity {
            AlertSeverity::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state reported by the alert's provider. Unknown states are
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertStatus {
    #[default]
    Firing,
    Resolved,
    Acknowledged,
    Suppressed,
    Pending,
    Other(String),
}

impl AlertStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AlertStatus::Firing => "firing",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Suppressed => "suppressed",
            AlertStatus::Pending => "pending",
            AlertStatus::Other(s) => s,
        }
    }
}

impl From<String> for AlertStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "firing" => AlertStatus::Firing,
            "resolved" => AlertStatus::Resolved,
            "acknowledged" => AlertStatus::Acknowledged,
            "suppressed" => AlertStatus::Suppressed,
            "pending" => AlertStatus::Pending,
            _ => AlertStatus::Other(s),
        }
    }
}

impl From<AlertStatus> for String {
    fn from(status: AlertStatus) -> Self {
        match status {
            AlertStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `null` reads as the type's default, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One alert record as delivered by the source.
///
/// Known fields are typed; every other key from the payload is kept in
/// `extra`, in the order it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: AlertStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: AlertSeverity,
    pub last_received: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub environment: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fingerprint: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pushed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deleted: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group: bool,
    #[serde(default)]
    pub is_duplicate: Option<bool>,
    #[serde(default)]
    pub duplicate_reason: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A field value as seen by the option filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    /// List-valued field. Non-string items are `None` and never match.
    List(Vec<Option<&'a str>>),
    /// Present, but neither a string nor a list (flags, timestamps, numbers).
    Other,
}

impl<'a> FieldValue<'a> {
    fn from_json(value: &'a Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::List(items.iter().map(Value::as_str).collect()),
            _ => FieldValue::Other,
        }
    }
}

impl Alert {
    /// Build a minimal alert; the remaining fields take their defaults.
    pub fn new(id: impl Into<String>, name: impl Into<String>, last_received: DateTime<Utc>) -> Self {
        let id = id.into();
        Self {
            fingerprint: id.clone(),
            id,
            name: name.into(),
            status: AlertStatus::default(),
            severity: AlertSeverity::default(),
            last_received,
            environment: String::new(),
            service: None,
            source: Vec::new(),
            message: None,
            description: None,
            url: None,
            pushed: false,
            deleted: false,
            group: false,
            is_duplicate: None,
            duplicate_reason: None,
            assignee: None,
            extra: Map::new(),
        }
    }

    /// Look up a field by its exact payload name.
    ///
    /// Known names go through the typed accessors, anything else through
    /// the extra map. `None` means the alert has no such field.
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Text(&self.id)),
            "name" => Some(FieldValue::Text(&self.name)),
            "status" => Some(FieldValue::Text(self.status.as_str())),
            "severity" => Some(FieldValue::Text(self.severity.as_str())),
            "environment" => Some(FieldValue::Text(&self.environment)),
            "fingerprint" => Some(FieldValue::Text(&self.fingerprint)),
            "service" => self.service.as_deref().map(FieldValue::Text),
            "message" => self.message.as_deref().map(FieldValue::Text),
            "description" => self.description.as_deref().map(FieldValue::Text),
            "url" => self.url.as_deref().map(FieldValue::Text),
            "duplicateReason" => self.duplicate_reason.as_deref().map(FieldValue::Text),
            "assignee" => self.assignee.as_deref().map(FieldValue::Text),
            "source" => Some(FieldValue::List(
                self.source.iter().map(|s| Some(s.as_str())).collect(),
            )),
            "lastReceived" | "pushed" | "deleted" | "group" => Some(FieldValue::Other),
            "isDuplicate" => self.is_duplicate.map(|_| FieldValue::Other),
            _ => self.extra.get(name).map(FieldValue::from_json),
        }
    }

    /// Render an extra field for a table cell.
    pub fn extra_display(&self, key: &str) -> String {
        match self.extra.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => other.to_string(),
        }
    }

    /// Human-readable age relative to `now`, e.g. "5m ago".
    pub fn age_display(&self, now: DateTime<Utc>) -> String {
        let secs = (now - self.last_received).num_seconds().max(0);
        let age = if secs < 60 {
            t!("age.seconds", n = secs)
        } else if secs < 3600 {
            t!("age.minutes", n = secs / 60)
        } else if secs < 86_400 {
            t!("age.hours", n = secs / 3600)
        } else {
            t!("age.days", n = secs / 86_400)
        };
        age.to_string()
    }
}
