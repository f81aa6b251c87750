mod dispatch;
mod routes;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    audit::AuditLog,
    config::{Config, NotifierConfig},
    notifier::Notifier,
};

pub use dispatch::{BODY_READ_FAILED, DELIVERY_FAILED, NOT_FOUND, RESOLVED_SUPPRESSED};
pub use routes::{Route, RouteTable, ALERT_PATHS, ARGOCD_PATHS, HEALTH_PATHS, READY_PATHS};

/// State shared by every request. Only the audit sink behind `audit` is mutable.
pub struct AppState {
    routes: RouteTable,
    audit: AuditLog,
    notifier: Arc<dyn Notifier>,
    notifier_config: Arc<NotifierConfig>,
    max_body_bytes: usize,
}

pub struct Server {
    state: AppState,
}

impl Server {
    pub fn new(config: &Config, audit: AuditLog, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: AppState {
                routes: RouteTable::standard(),
                audit,
                notifier,
                notifier_config: Arc::new(config.notifier.clone()),
                max_body_bytes: config.server.max_body_bytes,
            },
        }
    }

    /// Replace the standard route table.
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.state.routes = routes;
        self
    }

    pub fn build_router(self) -> Router {
        let state = Arc::new(self.state);

        // Every path goes through the route table, so the router itself has no routes
        Router::new()
            .fallback(dispatch::dispatch)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(state)
    }

    pub async fn start(self, addr: &str) -> crate::Result<()> {
        let app = self.build_router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Gateway listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("Gateway stopped");
        Ok(())
    }
}

/// Waits for CTRL+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received CTRL+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
