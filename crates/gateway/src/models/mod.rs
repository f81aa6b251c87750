mod alert;
mod deployment;

pub use alert::{AlertEvent, AlertManagerAlert, AlertManagerWebhook, AlertStatus};
pub use deployment::{ArgocdNotification, DeploymentNotification};

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Reads an explicit JSON `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// String map where the map itself or any value may be `null`.
pub(crate) fn string_map<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

/// A validated webhook payload, ready for the notifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NormalizedEvent {
    Alert(AlertEvent),
    Deployment(DeploymentNotification),
}

impl NormalizedEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizedEvent::Alert(_) => "alert",
            NormalizedEvent::Deployment(_) => "deployment",
        }
    }
}

impl From<AlertEvent> for NormalizedEvent {
    fn from(event: AlertEvent) -> Self {
        NormalizedEvent::Alert(event)
    }
}

impl From<DeploymentNotification> for NormalizedEvent {
    fn from(notification: DeploymentNotification) -> Self {
        NormalizedEvent::Deployment(notification)
    }
}
