use tracing::debug;

use super::traits::{InterpretError, PayloadInterpreter};
use crate::models::{AlertEvent, AlertManagerWebhook, NormalizedEvent};

/// Interprets Alertmanager webhook batches.
///
/// Only the first alert of a batch is inspected: it must carry a status and a
/// `severity` label, otherwise the whole batch is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlertInterpreter;

impl AlertInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn interpret_alert(&self, body: &[u8]) -> Result<AlertEvent, InterpretError> {
        let batch: AlertManagerWebhook = serde_json::from_slice(body)?;
        debug!("Decoded alert batch with {} alerts", batch.alerts.len());

        let first = batch
            .alerts
            .into_iter()
            .next()
            .ok_or(InterpretError::EmptyBatch)?;

        AlertEvent::try_from(first)
    }
}

impl PayloadInterpreter for AlertInterpreter {
    fn name(&self) -> &'static str {
        "alert"
    }

    fn rejection_message(&self) -> &'static str {
        "invalid alert format"
    }

    fn interpret(&self, body: &[u8]) -> Result<NormalizedEvent, InterpretError> {
        self.interpret_alert(body).map(NormalizedEvent::from)
    }

    fn describe(&self, event: &NormalizedEvent) -> String {
        match event {
            NormalizedEvent::Alert(alert) => {
                let mut labels: Vec<String> = alert
                    .labels()
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                labels.sort();
                format!(
                    "status={} severity={} labels={{{}}}",
                    alert.status(),
                    alert.severity(),
                    labels.join(", ")
                )
            }
            other => format!("unexpected {} event", other.kind()),
        }
    }
}
