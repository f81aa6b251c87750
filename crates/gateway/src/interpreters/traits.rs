use thiserror::Error;

use crate::models::NormalizedEvent;

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("payload is not valid JSON for this webhook: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("alert batch contains no alerts")]
    EmptyBatch,
    #[error("first alert has no status")]
    MissingStatus,
    #[error("first alert has no severity label")]
    MissingSeverity,
}

/// Turns a raw webhook body into a [`NormalizedEvent`].
///
/// One implementation exists per upstream system. The dispatcher owns the
/// HTTP side and the audit trail; an interpreter only decodes and validates.
pub trait PayloadInterpreter: Send + Sync {
    /// Short name used in audit records and traces.
    fn name(&self) -> &'static str;

    /// Body of the 400 response for a rejected payload. Never carries error detail.
    fn rejection_message(&self) -> &'static str;

    /// Whether the dispatcher writes the rejection reason to the audit log.
    fn audits_rejection_detail(&self) -> bool {
        false
    }

    fn interpret(&self, body: &[u8]) -> Result<NormalizedEvent, InterpretError>;

    /// Human-readable rendering of a decoded event for the audit log.
    fn describe(&self, event: &NormalizedEvent) -> String;
}
