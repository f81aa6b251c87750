use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

use super::AuditSink;

/// Audit sink backed by a file opened in append mode.
///
/// Writes are serialized by a mutex and each record is synced to disk before
/// the lock is released.
pub struct FileAuditSink {
    file: Mutex<File>,
    path: PathBuf,
}

impl FileAuditSink {
    pub async fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        info!("Audit log opened at {}", path.display());
        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn append_line(&self, text: &str) -> crate::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(text.as_bytes()).await?;
        file.sync_data().await?;
        Ok(())
    }
}
