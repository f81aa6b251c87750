use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{null_as_default, string_map};
use crate::interpreters::InterpretError;

// AlertManager webhook payload structures. Senders are free to send `null`
// for anything, which decodes as empty.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertManagerWebhook {
    #[serde(deserialize_with = "null_as_default")]
    pub receiver: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alerts: Vec<AlertManagerAlert>,
    #[serde(rename = "groupLabels", deserialize_with = "string_map")]
    pub group_labels: HashMap<String, String>,
    #[serde(rename = "commonLabels", deserialize_with = "string_map")]
    pub common_labels: HashMap<String, String>,
    #[serde(rename = "commonAnnotations", deserialize_with = "string_map")]
    pub common_annotations: HashMap<String, String>,
    #[serde(rename = "externalURL", deserialize_with = "null_as_default")]
    pub external_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(rename = "groupKey", deserialize_with = "null_as_default")]
    pub group_key: String,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertManagerAlert {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "string_map")]
    pub labels: HashMap<String, String>,
    #[serde(deserialize_with = "string_map")]
    pub annotations: HashMap<String, String>,
    /// Kept as sent; nothing downstream interprets the timestamps.
    #[serde(rename = "startsAt")]
    pub starts_at: Option<String>,
    #[serde(rename = "endsAt")]
    pub ends_at: Option<String>,
    #[serde(rename = "generatorURL", deserialize_with = "null_as_default")]
    pub generator_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertStatus {
    Firing,
    Resolved,
    /// Any other non-empty status the sender used, kept verbatim.
    /// Matching is exact, so `"FIRING"` lands here too.
    Other(String),
}

impl AlertStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AlertStatus::Firing => "firing",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Other(s) => s,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, AlertStatus::Resolved)
    }
}

impl From<String> for AlertStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "firing" => AlertStatus::Firing,
            "resolved" => AlertStatus::Resolved,
            _ => AlertStatus::Other(s),
        }
    }
}

impl From<AlertStatus> for String {
    fn from(status: AlertStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first alert of a batch, after validation.
///
/// Only obtainable through `TryFrom<AlertManagerAlert>`, which refuses entries
/// with an empty status or an empty `severity` label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    status: AlertStatus,
    severity: String,
    labels: HashMap<String, String>,
    annotations: HashMap<String, String>,
}

impl AlertEvent {
    pub fn status(&self) -> &AlertStatus {
        &self.status
    }

    pub fn severity(&self) -> &str {
        &self.severity
    }

    pub fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }

    pub fn annotations(&self) -> &HashMap<String, String> {
        &self.annotations
    }

    pub fn alertname(&self) -> Option<&str> {
        self.labels.get("alertname").map(String::as_str)
    }

    /// `summary` annotation, falling back to `description`.
    pub fn summary(&self) -> Option<&str> {
        self.annotations
            .get("summary")
            .or_else(|| self.annotations.get("description"))
            .map(String::as_str)
    }
}

impl TryFrom<AlertManagerAlert> for AlertEvent {
    type Error = InterpretError;

    fn try_from(alert: AlertManagerAlert) -> Result<Self, Self::Error> {
        if alert.status.is_empty() {
            return Err(InterpretError::MissingStatus);
        }
        let severity = match alert.labels.get("severity") {
            Some(severity) if !severity.is_empty() => severity.clone(),
            _ => return Err(InterpretError::MissingSeverity),
        };

        Ok(AlertEvent {
            status: AlertStatus::from(alert.status),
            severity,
            labels: alert.labels,
            annotations: alert.annotations,
        })
    }
}
