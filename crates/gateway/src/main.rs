use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sms_devops_gateway::{
    audit::{AuditLog, FileAuditSink},
    config::Config,
    notifier::build_notifier,
    server::Server,
};

#[derive(Parser, Debug)]
#[command(name = "sms-devops-gateway")]
#[command(about = "Forward Alertmanager and ArgoCD webhooks to an SMS relay", long_about = None)]
struct Args {
    /// Listen address, overrides SERVER_ADDR
    #[arg(long)]
    addr: Option<String>,

    /// Audit log file, overrides AUDIT_LOG_PATH
    #[arg(long)]
    audit_log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    if let Some(path) = args.audit_log {
        config.audit.path = path;
    }
    info!("Loaded configuration: {:?}", config);

    let sink = FileAuditSink::open(&config.audit.path)
        .await
        .with_context(|| format!("failed to open audit log {}", config.audit.path.display()))?;
    let audit = AuditLog::new(Arc::new(sink));

    let notifier = build_notifier(&config.notifier).context("failed to build notifier")?;
    info!("Using {} notifier", notifier.kind());

    let server = Server::new(&config, audit, notifier);
    server.start(&config.server.addr).await?;

    Ok(())
}
