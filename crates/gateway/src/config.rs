use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::template::{MessageFormatter, DEFAULT_ALERT_TEMPLATE, DEFAULT_ARGOCD_TEMPLATE};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotifierKind {
    #[serde(rename = "sms")]
    Sms,
    #[serde(rename = "stdout")]
    Stdout,
}

impl Default for NotifierKind {
    fn default() -> Self {
        NotifierKind::Sms
    }
}

impl FromStr for NotifierKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sms" => Ok(NotifierKind::Sms),
            "stdout" => Ok(NotifierKind::Stdout),
            other => Err(crate::Error::Config(format!(
                "NOTIFIER_KIND must be 'sms' or 'stdout', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub audit: AuditConfig,
    pub notifier: NotifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
    /// Upper bound on a webhook body; larger bodies count as unreadable.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    pub path: PathBuf,
}

/// Everything the notifier needs to reach its destination.
///
/// The dispatcher hands this to the notifier untouched. `send_resolved` is the
/// one gateway-level policy kept alongside the relay settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub kind: NotifierKind,
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    pub sender: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub argocd_recipients: Vec<String>,
    pub timeout_secs: u64,
    pub send_resolved: bool,
    pub alert_template: String,
    pub argocd_template: String,
}

// Credentials stay out of `Debug` so the startup log can print the config.
impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("sender", &self.sender)
            .field("recipients", &self.recipients)
            .field("argocd_recipients", &self.argocd_recipients)
            .field("timeout_secs", &self.timeout_secs)
            .field("send_resolved", &self.send_resolved)
            .finish()
    }
}

impl NotifierConfig {
    /// Recipients for deployment notifications, falling back to the alert list.
    pub fn deployment_recipients(&self) -> &[String] {
        if self.argocd_recipients.is_empty() {
            &self.recipients
        } else {
            &self.argocd_recipients
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: NotifierKind::Sms,
            endpoint: None,
            username: None,
            password: None,
            api_key: None,
            sender: "DevOps".to_string(),
            recipients: Vec::new(),
            argocd_recipients: Vec::new(),
            timeout_secs: 10,
            send_resolved: true,
            alert_template: DEFAULT_ALERT_TEMPLATE.to_string(),
            argocd_template: DEFAULT_ARGOCD_TEMPLATE.to_string(),
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(name: &str, default: T) -> crate::Result<T> {
    match env_opt(name) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            crate::Error::Config(format!("{} has an invalid value: '{}'", name, raw))
        }),
        None => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    pub fn load() -> crate::Result<Self> {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let config = Config {
            server: ServerConfig {
                addr: env_opt("SERVER_ADDR").unwrap_or(defaults.server.addr),
                max_body_bytes: env_parse("MAX_BODY_BYTES", defaults.server.max_body_bytes)?,
            },
            audit: AuditConfig {
                path: env_opt("AUDIT_LOG_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.audit.path),
            },
            notifier: NotifierConfig {
                kind: match env_opt("NOTIFIER_KIND") {
                    Some(raw) => raw.parse()?,
                    None => NotifierKind::default(),
                },
                endpoint: env_opt("SMS_ENDPOINT"),
                username: env_opt("SMS_USERNAME"),
                password: env_opt("SMS_PASSWORD"),
                api_key: env_opt("SMS_API_KEY"),
                sender: env_opt("SMS_SENDER").unwrap_or(defaults.notifier.sender),
                recipients: env_opt("SMS_RECIPIENTS")
                    .map(|raw| parse_list(&raw))
                    .unwrap_or_default(),
                argocd_recipients: env_opt("ARGOCD_RECIPIENTS")
                    .map(|raw| parse_list(&raw))
                    .unwrap_or_default(),
                timeout_secs: env_parse("SMS_TIMEOUT_SECS", defaults.notifier.timeout_secs)?,
                send_resolved: env_parse("SEND_RESOLVED", defaults.notifier.send_resolved)?,
                alert_template: env_opt("ALERT_TEMPLATE")
                    .unwrap_or(defaults.notifier.alert_template),
                argocd_template: env_opt("ARGOCD_TEMPLATE")
                    .unwrap_or(defaults.notifier.argocd_template),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.server.max_body_bytes == 0 {
            return Err(crate::Error::Config(
                "MAX_BODY_BYTES must be greater than zero".to_string(),
            ));
        }

        match self.notifier.kind {
            NotifierKind::Sms => {
                let endpoint = self.notifier.endpoint.as_deref().ok_or_else(|| {
                    crate::Error::Config(
                        "SMS_ENDPOINT must be set when using the sms notifier".to_string(),
                    )
                })?;
                url::Url::parse(endpoint).map_err(|e| {
                    crate::Error::Config(format!("SMS_ENDPOINT is not a valid URL: {}", e))
                })?;
                if self.notifier.recipients.is_empty() {
                    tracing::warn!("SMS_RECIPIENTS is not set. Alerts will not reach anyone.");
                }
            }
            NotifierKind::Stdout => {}
        }

        // Both templates must compile before the server accepts traffic
        MessageFormatter::new(&self.notifier.alert_template, &self.notifier.argocd_template)
            .map_err(|e| crate::Error::Config(format!("invalid message template: {}", e)))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: "0.0.0.0:8080".to_string(),
                max_body_bytes: 10 * 1024 * 1024,
            },
            audit: AuditConfig {
                path: PathBuf::from("logs/gateway.log"),
            },
            notifier: NotifierConfig::default(),
        }
    }
}
