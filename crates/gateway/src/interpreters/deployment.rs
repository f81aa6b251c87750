use super::traits::{InterpretError, PayloadInterpreter};
use crate::models::{ArgocdNotification, DeploymentNotification, NormalizedEvent};

/// Interprets ArgoCD notification webhooks.
///
/// Any body that decodes as an [`ArgocdNotification`] is accepted; field
/// values are not checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeploymentInterpreter;

impl DeploymentInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn interpret_notification(
        &self,
        body: &[u8],
    ) -> Result<DeploymentNotification, InterpretError> {
        let notification: ArgocdNotification = serde_json::from_slice(body)?;
        Ok(notification.into())
    }
}

impl PayloadInterpreter for DeploymentInterpreter {
    fn name(&self) -> &'static str {
        "argocd"
    }

    fn rejection_message(&self) -> &'static str {
        "invalid ArgoCD notification format"
    }

    fn audits_rejection_detail(&self) -> bool {
        true
    }

    fn interpret(&self, body: &[u8]) -> Result<NormalizedEvent, InterpretError> {
        self.interpret_notification(body).map(NormalizedEvent::from)
    }

    fn describe(&self, event: &NormalizedEvent) -> String {
        match event {
            NormalizedEvent::Deployment(notification) => {
                serde_json::to_string_pretty(notification)
                    .unwrap_or_else(|e| format!("<unserializable notification: {}>", e))
            }
            other => format!("unexpected {} event", other.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_shaped_object_accepted() {
        let notification = DeploymentInterpreter::new()
            .interpret_notification(
                br#"{"app":"payments","sync_status":"OutOfSync","health_status":"Degraded","revision":"abc123"}"#,
            )
            .unwrap();
        assert_eq!(notification.application, "payments");
        assert_eq!(notification.sync_status, "OutOfSync");
        assert_eq!(notification.health_status, "Degraded");
        assert_eq!(notification.revision, "abc123");
    }

    #[test]
    fn test_empty_field_values_accepted() {
        let result = DeploymentInterpreter::new()
            .interpret(br#"{"app":"","sync_status":"","health_status":""}"#);
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_json_rejected_with_detail() {
        let interpreter = DeploymentInterpreter::new();
        let err = interpreter.interpret(b"{not json").unwrap_err();
        assert!(matches!(err, InterpretError::Decode(_)));
        assert!(interpreter.audits_rejection_detail());
    }

    #[test]
    fn test_describe_is_pretty_json() {
        let interpreter = DeploymentInterpreter::new();
        let event = interpreter.interpret(br#"{"app":"web"}"#).unwrap();
        let described = interpreter.describe(&event);
        assert!(described.contains("\n  \"application\": \"web\""));
    }
}
