#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use mockall::mock;
use sms_devops_gateway::{
    audit::{AuditLog, AuditSink, MemoryAuditSink},
    config::{Config, NotifierConfig},
    models::NormalizedEvent,
    notifier::{Notifier, NotifyError},
    server::Server,
};
use std::collections::HashMap;
use std::sync::Arc;

mock! {
    pub Relay {}

    #[async_trait]
    impl Notifier for Relay {
        fn kind(&self) -> &'static str;
        async fn send(
            &self,
            event: &NormalizedEvent,
            config: &NotifierConfig,
        ) -> Result<(), NotifyError>;
    }
}

/// A relay that must never be asked to send anything.
pub fn silent_relay() -> MockRelay {
    let mut relay = MockRelay::new();
    relay.expect_kind().return_const("mock");
    relay.expect_send().never();
    relay
}

/// A relay that accepts exactly `times` messages.
pub fn accepting_relay(times: usize) -> MockRelay {
    let mut relay = MockRelay::new();
    relay.expect_kind().return_const("mock");
    relay.expect_send().times(times).returning(|_, _| Ok(()));
    relay
}

pub struct Gateway {
    pub server: TestServer,
    pub audit: Arc<MemoryAuditSink>,
}

pub fn gateway(relay: MockRelay) -> Gateway {
    gateway_with(relay, |_| {})
}

pub fn gateway_with(relay: MockRelay, configure: impl FnOnce(&mut Config)) -> Gateway {
    let mut config = Config::default();
    configure(&mut config);

    let audit = Arc::new(MemoryAuditSink::new());
    let server = Server::new(&config, AuditLog::new(audit.clone()), Arc::new(relay));
    let server = TestServer::new(server.build_router()).expect("failed to start test server");

    Gateway { server, audit }
}

/// An audit sink whose every write fails.
pub struct FailingSink;

#[async_trait]
impl AuditSink for FailingSink {
    async fn append_line(&self, _text: &str) -> sms_devops_gateway::Result<()> {
        Err(sms_devops_gateway::Error::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "no space left on device",
        )))
    }
}

/// A gateway whose audit trail cannot be written.
pub fn gateway_without_audit(relay: MockRelay) -> TestServer {
    let server = Server::new(
        &Config::default(),
        AuditLog::new(Arc::new(FailingSink)),
        Arc::new(relay),
    );
    TestServer::new(server.build_router()).expect("failed to start test server")
}

/// One parsed audit record: `[ts] <request id> <tag>: <text>`.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub request_id: String,
    pub tag: String,
    pub text: String,
}

pub fn entries(audit: &MemoryAuditSink) -> Vec<AuditEntry> {
    audit
        .lines()
        .iter()
        .map(|line| {
            let rest = line.split_once("] ").expect("missing timestamp").1;
            let (request_id, rest) = rest.split_once(' ').expect("missing request id");
            let (tag, text) = rest.split_once(": ").expect("missing tag");
            AuditEntry {
                request_id: request_id.to_string(),
                tag: tag.to_string(),
                text: text.to_string(),
            }
        })
        .collect()
}

/// Audit tags grouped by request id, in write order.
pub fn tags_by_request(audit: &MemoryAuditSink) -> HashMap<String, Vec<String>> {
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for entry in entries(audit) {
        grouped.entry(entry.request_id).or_default().push(entry.tag);
    }
    grouped
}

pub fn firing_alert_body() -> String {
    serde_json::json!({
        "receiver": "sms",
        "status": "firing",
        "alerts": [{
            "status": "firing",
            "labels": {"alertname": "KubePodCrashLooping", "severity": "critical", "namespace": "prod"},
            "annotations": {"summary": "pod restarting"},
            "startsAt": "2024-05-01T12:00:00Z",
            "fingerprint": "abc123"
        }],
        "version": "4"
    })
    .to_string()
}

pub fn argocd_body() -> String {
    serde_json::json!({
        "app": "checkout",
        "sync_status": "Synced",
        "health_status": "Healthy",
        "revision": "4f2a9c1",
        "cluster": "prod-eu"
    })
    .to_string()
}
