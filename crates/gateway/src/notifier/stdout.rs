use async_trait::async_trait;
use serde_json::json;

use super::{recipients_for, Notifier, NotifyError};
use crate::config::NotifierConfig;
use crate::models::NormalizedEvent;
use crate::template::MessageFormatter;

/// Dry-run notifier: prints each rendered message as one JSON line.
#[derive(Debug)]
pub struct StdoutNotifier {
    formatter: MessageFormatter,
}

impl StdoutNotifier {
    pub fn new(config: &NotifierConfig) -> crate::Result<Self> {
        Ok(Self {
            formatter: MessageFormatter::new(&config.alert_template, &config.argocd_template)?,
        })
    }

    pub fn render_line(
        &self,
        event: &NormalizedEvent,
        config: &NotifierConfig,
    ) -> Result<String, NotifyError> {
        let line = json!({
            "kind": event.kind(),
            "to": recipients_for(event, config),
            "text": self.formatter.render(event)?,
        });
        Ok(line.to_string())
    }
}

#[async_trait]
impl Notifier for StdoutNotifier {
    fn kind(&self) -> &'static str {
        "stdout"
    }

    async fn send(
        &self,
        event: &NormalizedEvent,
        config: &NotifierConfig,
    ) -> Result<(), NotifyError> {
        println!("{}", self.render_line(event, config)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreters::{AlertInterpreter, DeploymentInterpreter, PayloadInterpreter};

    fn config() -> NotifierConfig {
        NotifierConfig {
            recipients: vec!["+15550100".to_string()],
            ..NotifierConfig::default()
        }
    }

    #[test]
    fn test_render_line_is_json() {
        let config = config();
        let notifier = StdoutNotifier::new(&config).unwrap();
        let event = AlertInterpreter::new()
            .interpret(br#"{"alerts":[{"status":"firing","labels":{"severity":"warning"}}]}"#)
            .unwrap();

        let line: serde_json::Value =
            serde_json::from_str(&notifier.render_line(&event, &config).unwrap()).unwrap();
        assert_eq!(line["kind"], "alert");
        assert_eq!(line["to"][0], "+15550100");
        assert_eq!(line["text"], "[FIRING] WARNING: alert");
    }

    #[tokio::test]
    async fn test_send_deployment() {
        let config = config();
        let notifier = StdoutNotifier::new(&config).unwrap();
        let event = DeploymentInterpreter::new().interpret(br#"{"app":"web"}"#).unwrap();
        assert!(notifier.send(&event, &config).await.is_ok());
    }

    #[tokio::test]
    async fn test_render_failure_surfaces() {
        let mut config = config();
        config.argocd_template = "{{ cluster }}".to_string();
        let notifier = StdoutNotifier::new(&config).unwrap();
        let event = DeploymentInterpreter::new().interpret(br#"{"app":"web"}"#).unwrap();
        assert!(matches!(
            notifier.send(&event, &config).await,
            Err(NotifyError::Render(_))
        ));
    }
}
