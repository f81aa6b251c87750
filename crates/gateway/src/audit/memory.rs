use async_trait::async_trait;
use std::sync::Mutex;

use super::AuditSink;

/// Keeps audit records in memory. Used by tests and local tooling.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<String>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record appended so far, in write order.
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn contents(&self) -> String {
        self.lines().concat()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append_line(&self, text: &str) -> crate::Result<()> {
        self.records
            .lock()
            .map_err(|_| crate::Error::Internal("audit buffer poisoned".to_string()))?
            .push(text.to_string());
        Ok(())
    }
}
