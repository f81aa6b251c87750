//! Append-only audit trail of every request the gateway handles.
//!
//! The trail is written through an [`AuditSink`]. Callers never see sink
//! failures: [`AuditLog`] reports them through `tracing` and carries on, so a
//! full disk or a revoked file handle cannot fail a webhook.

mod file;
mod memory;

pub use file::FileAuditSink;
pub use memory::MemoryAuditSink;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Destination for audit lines.
///
/// Each call appends one record, which may span several physical lines.
/// Implementations must keep a record contiguous under concurrent callers.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append_line(&self, text: &str) -> crate::Result<()>;
}

/// One entry of the audit trail. Never mutated once written.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub request_id: Option<Uuid>,
    pub tag: String,
    pub text: String,
}

impl AuditRecord {
    pub fn new(request_id: Option<Uuid>, tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            request_id,
            tag: tag.into(),
            text: text.into(),
        }
    }

    /// `[<rfc3339>] <request id> <tag>: <text>` terminated by a newline.
    pub fn render(&self) -> String {
        let ts = self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut line = match self.request_id {
            Some(id) => format!("[{}] {} {}: {}", ts, id, self.tag, self.text),
            None => format!("[{}] {}: {}", ts, self.tag, self.text),
        };
        if !line.ends_with('\n') {
            line.push('\n');
        }
        line
    }
}

/// Best-effort handle to the audit sink, shared by every request.
#[derive(Clone)]
pub struct AuditLog {
    sink: Arc<dyn AuditSink>,
}

impl AuditLog {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    pub async fn write(&self, record: AuditRecord) {
        let rendered = record.render();
        if let Err(e) = self.sink.append_line(&rendered).await {
            warn!(
                tag = %record.tag,
                request_id = ?record.request_id,
                "Audit write failed, record dropped: {}",
                e
            );
        }
    }

    pub async fn record(&self, request_id: Uuid, tag: &str, text: impl Into<String>) {
        self.write(AuditRecord::new(Some(request_id), tag, text)).await;
    }
}
