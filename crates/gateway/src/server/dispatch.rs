use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::routes::Route;
use super::AppState;
use crate::interpreters::PayloadInterpreter;
use crate::models::NormalizedEvent;

pub const BODY_READ_FAILED: &str = "cannot read request body";
pub const NOT_FOUND: &str = "Not Found";
pub const DELIVERY_FAILED: &str = "notification delivery failed";
pub const RESOLVED_SUPPRESSED: &str = "resolved alert suppressed";

fn text(status: StatusCode, body: &'static str) -> Response {
    (status, body).into_response()
}

/// Entry point for every request, whatever its method or path.
pub async fn dispatch(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    state
        .audit
        .record(request_id, "request", format!("{} {} from {}", method, path, remote))
        .await;

    let route = state.routes.resolve(&path).cloned();
    match route {
        Some(Route::Health) => text(StatusCode::OK, "OK"),
        Some(Route::Ready) => text(StatusCode::OK, "Ready"),
        Some(Route::Webhook(interpreter)) => {
            state
                .audit
                .record(request_id, "route", format!("{} -> {} handler", path, interpreter.name()))
                .await;
            handle_webhook(&state, request_id, interpreter.as_ref(), request.into_body()).await
        }
        None => {
            debug!("No route for {} {}", method, path);
            state.audit.record(request_id, "not_found", path).await;
            text(StatusCode::NOT_FOUND, NOT_FOUND)
        }
    }
}

async fn handle_webhook(
    state: &AppState,
    request_id: Uuid,
    interpreter: &dyn PayloadInterpreter,
    body: Body,
) -> Response {
    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read {} webhook body: {}", interpreter.name(), e);
            state
                .audit
                .record(request_id, "body_error", format!("{}: {}", BODY_READ_FAILED, e))
                .await;
            return text(StatusCode::BAD_REQUEST, BODY_READ_FAILED);
        }
    };

    state
        .audit
        .record(
            request_id,
            "received",
            format!("{} webhook body:\n{}\n", interpreter.name(), String::from_utf8_lossy(&bytes)),
        )
        .await;

    let event = match interpreter.interpret(&bytes) {
        Ok(event) => event,
        Err(e) => {
            let rejection = interpreter.rejection_message();
            let audit_text = if interpreter.audits_rejection_detail() {
                format!("{}: {}", rejection, e)
            } else {
                rejection.to_string()
            };
            info!("Rejected {} webhook", interpreter.name());
            state.audit.record(request_id, "rejected", audit_text).await;
            return text(StatusCode::BAD_REQUEST, rejection);
        }
    };

    state
        .audit
        .record(request_id, "parsed", interpreter.describe(&event))
        .await;

    if let NormalizedEvent::Alert(alert) = &event {
        if alert.status().is_resolved() && !state.notifier_config.send_resolved {
            info!("Suppressing resolved alert, resolved notifications are disabled");
            state.audit.record(request_id, "suppressed", RESOLVED_SUPPRESSED).await;
            return text(StatusCode::OK, RESOLVED_SUPPRESSED);
        }
    }

    state
        .audit
        .record(
            request_id,
            "dispatch",
            format!("sending {} via {} notifier", event.kind(), state.notifier.kind()),
        )
        .await;

    match state.notifier.send(&event, &state.notifier_config).await {
        Ok(()) => {
            info!("Forwarded {} event", event.kind());
            state.audit.record(request_id, "delivered", event.kind()).await;
            let body = match event {
                NormalizedEvent::Alert(_) => "alert forwarded",
                NormalizedEvent::Deployment(_) => "notification forwarded",
            };
            text(StatusCode::OK, body)
        }
        Err(e) => {
            error!("Failed to deliver {} event: {}", event.kind(), e);
            state
                .audit
                .record(request_id, "delivery_failed", e.to_string())
                .await;
            text(e.status_code(), DELIVERY_FAILED)
        }
    }
}
