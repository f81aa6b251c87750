//! Message text rendering using Tera
//!
//! Templates are configured per event kind and compiled once at startup.
//! Alertmanager-style field references (`{{ .status }}`) are rewritten to
//! Tera syntax before compilation.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::models::{AlertEvent, DeploymentNotification, NormalizedEvent};
use crate::Result;

pub const DEFAULT_ALERT_TEMPLATE: &str =
    "[{{ status | upper }}] {{ severity | upper }}: {{ alertname }}{% if summary %} - {{ summary }}{% endif %}";

pub const DEFAULT_ARGOCD_TEMPLATE: &str = "[ArgoCD] {{ application }}: sync={{ sync_status }} health={{ health_status }}{% if revision %} rev={{ revision }}{% endif %}{% if message %} - {{ message }}{% endif %}";

const ALERT: &str = "alert";
const ARGOCD: &str = "argocd";

/// Convert Alertmanager-style field references to Tera syntax
///
/// - {{ .path.to.value }} -> {{ path.to.value }}
pub fn convert_dotted_refs(template: &str) -> String {
    template.replace("{{ .", "{{ ").replace("{{.", "{{")
}

#[derive(Serialize)]
struct AlertContext<'a> {
    status: &'a str,
    severity: &'a str,
    alertname: &'a str,
    summary: &'a str,
    labels: &'a HashMap<String, String>,
    annotations: &'a HashMap<String, String>,
}

impl<'a> From<&'a AlertEvent> for AlertContext<'a> {
    fn from(event: &'a AlertEvent) -> Self {
        Self {
            status: event.status().as_str(),
            severity: event.severity(),
            alertname: event.alertname().unwrap_or("alert"),
            summary: event.summary().unwrap_or(""),
            labels: event.labels(),
            annotations: event.annotations(),
        }
    }
}

/// Compiled message templates for both event kinds.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    tera: Tera,
}

impl MessageFormatter {
    pub fn new(alert_template: &str, argocd_template: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (ALERT, convert_dotted_refs(alert_template)),
            (ARGOCD, convert_dotted_refs(argocd_template)),
        ])?;
        Ok(Self { tera })
    }

    pub fn render(&self, event: &NormalizedEvent) -> Result<String> {
        match event {
            NormalizedEvent::Alert(alert) => self.render_alert(alert),
            NormalizedEvent::Deployment(notification) => self.render_deployment(notification),
        }
    }

    pub fn render_alert(&self, event: &AlertEvent) -> Result<String> {
        let context = Context::from_serialize(AlertContext::from(event))?;
        Ok(self.tera.render(ALERT, &context)?)
    }

    pub fn render_deployment(&self, notification: &DeploymentNotification) -> Result<String> {
        let context = Context::from_serialize(notification)?;
        Ok(self.tera.render(ARGOCD, &context)?)
    }
}
