mod sms;
mod stdout;

pub use sms::{SmsMessage, SmsNotifier};
pub use stdout::StdoutNotifier;

use async_trait::async_trait;
use http::StatusCode;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{NotifierConfig, NotifierKind};
use crate::models::NormalizedEvent;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifier not configured: {0}")]
    NotConfigured(String),
    #[error("failed to render message: {0}")]
    Render(#[from] crate::Error),
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl NotifyError {
    /// HTTP status the gateway answers with when delivery fails.
    pub fn status_code(&self) -> StatusCode {
        match self {
            NotifyError::Transport(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            NotifyError::Transport(_) | NotifyError::Rejected { .. } => StatusCode::BAD_GATEWAY,
            NotifyError::NotConfigured(_) | NotifyError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Delivers a normalized event to its final destination.
///
/// Exactly one delivery attempt is made per call. `Ok(())` means the
/// destination accepted the message.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn kind(&self) -> &'static str;

    async fn send(&self, event: &NormalizedEvent, config: &NotifierConfig)
        -> Result<(), NotifyError>;
}

pub fn build_notifier(config: &NotifierConfig) -> crate::Result<Arc<dyn Notifier>> {
    let notifier: Arc<dyn Notifier> = match config.kind {
        NotifierKind::Sms => Arc::new(SmsNotifier::new(config)?),
        NotifierKind::Stdout => Arc::new(StdoutNotifier::new(config)?),
    };
    Ok(notifier)
}

/// Recipients configured for this kind of event.
pub(crate) fn recipients_for<'a>(event: &NormalizedEvent, config: &'a NotifierConfig) -> &'a [String] {
    match event {
        NormalizedEvent::Alert(_) => &config.recipients,
        NormalizedEvent::Deployment(_) => config.deployment_recipients(),
    }
}
