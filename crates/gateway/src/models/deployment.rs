use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::null_as_default;

/// Body posted by an ArgoCD notifications webhook template.
///
/// The template is operator-defined, so every known field is optional and
/// anything else is kept in `metadata`. A `null` field reads as empty.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ArgocdNotification {
    #[serde(default, alias = "application", deserialize_with = "null_as_default")]
    pub app: String,
    #[serde(default, alias = "syncStatus", deserialize_with = "null_as_default")]
    pub sync_status: String,
    #[serde(default, alias = "healthStatus", deserialize_with = "null_as_default")]
    pub health_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revision: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentNotification {
    pub application: String,
    pub sync_status: String,
    pub health_status: String,
    pub revision: String,
    pub message: String,
    pub metadata: Value,
}

impl From<ArgocdNotification> for DeploymentNotification {
    fn from(n: ArgocdNotification) -> Self {
        DeploymentNotification {
            application: n.app,
            sync_status: n.sync_status,
            health_status: n.health_status,
            revision: n.revision,
            message: n.message,
            metadata: Value::Object(n.metadata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_camel_case_aliases() {
        let n: ArgocdNotification = serde_json::from_value(json!({
            "application": "checkout",
            "syncStatus": "Synced",
            "healthStatus": "Healthy"
        }))
        .unwrap();
        assert_eq!(n.app, "checkout");
        assert_eq!(n.sync_status, "Synced");
        assert_eq!(n.health_status, "Healthy");
        assert!(n.metadata.is_empty());
    }

    #[test]
    fn test_unknown_fields_kept_as_metadata() {
        let n: ArgocdNotification = serde_json::from_value(json!({
            "app": "checkout",
            "cluster": "prod-eu",
            "commit": {"author": "ci"}
        }))
        .unwrap();
        let notification = DeploymentNotification::from(n);
        assert_eq!(notification.application, "checkout");
        assert_eq!(notification.metadata["cluster"], "prod-eu");
        assert_eq!(notification.metadata["commit"]["author"], "ci");
    }

    #[test]
    fn test_empty_object_is_a_valid_notification() {
        let n: ArgocdNotification = serde_json::from_str("{}").unwrap();
        assert!(n.app.is_empty());
        assert!(n.sync_status.is_empty());
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let n: ArgocdNotification =
            serde_json::from_str(r#"{"app":"web","revision":null,"syncStatus":null,"extra":null}"#)
                .unwrap();
        assert_eq!(n.app, "web");
        assert!(n.revision.is_empty());
        assert!(n.sync_status.is_empty());
        assert_eq!(n.metadata.get("extra"), Some(&Value::Null));
    }

    #[test]
    fn test_wrong_field_type_fails_to_decode() {
        assert!(serde_json::from_str::<ArgocdNotification>(r#"{"app": 42}"#).is_err());
        assert!(serde_json::from_str::<ArgocdNotification>("[]").is_err());
    }
}
