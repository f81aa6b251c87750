use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{recipients_for, Notifier, NotifyError};
use crate::config::NotifierConfig;
use crate::models::NormalizedEvent;
use crate::template::MessageFormatter;

/// Longest slice of a relay error body kept in the error.
const MAX_ERROR_BODY: usize = 512;

/// JSON body posted to the SMS relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmsMessage {
    pub from: String,
    pub to: Vec<String>,
    pub text: String,
}

/// Sends events as text messages through an HTTP SMS relay.
pub struct SmsNotifier {
    client: Client,
    formatter: MessageFormatter,
}

impl SmsNotifier {
    pub fn new(config: &NotifierConfig) -> crate::Result<Self> {
        let formatter = MessageFormatter::new(&config.alert_template, &config.argocd_template)?;
        Ok(Self {
            client: Client::new(),
            formatter,
        })
    }

    pub fn build_message(
        &self,
        event: &NormalizedEvent,
        config: &NotifierConfig,
    ) -> Result<SmsMessage, NotifyError> {
        let to = recipients_for(event, config);
        if to.is_empty() {
            return Err(NotifyError::NotConfigured(format!(
                "no recipients for {} notifications",
                event.kind()
            )));
        }

        Ok(SmsMessage {
            from: config.sender.clone(),
            to: to.to_vec(),
            text: self.formatter.render(event)?,
        })
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn kind(&self) -> &'static str {
        "sms"
    }

    async fn send(
        &self,
        event: &NormalizedEvent,
        config: &NotifierConfig,
    ) -> Result<(), NotifyError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| NotifyError::NotConfigured("SMS endpoint".to_string()))?;
        let message = self.build_message(event, config)?;
        debug!("Sending {} message to {} recipients", event.kind(), message.to.len());

        let mut request = self
            .client
            .post(endpoint)
            .timeout(config.timeout())
            .json(&message);

        if let Some(username) = &config.username {
            request = request.basic_auth(username, config.password.as_ref());
        } else if let Some(api_key) = &config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            warn!("SMS relay answered {} for {} message", status, event.kind());
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Delivered {} message to {} recipients", event.kind(), message.to.len());
        Ok(())
    }
}
