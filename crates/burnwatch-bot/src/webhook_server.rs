//! HTTP surface: burn-event webhook ingestion and a liveness probe.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::burn_runtime::{SharedBurnBotRuntime, WebhookPayloadError, WebhookReport};

pub const WEBHOOK_PATH: &str = "/webhook";
pub const HEALTHZ_PATH: &str = "/healthz";

#[derive(Serialize)]
struct WebhookAccepted {
    status: &'static str,
    #[serde(flatten)]
    report: WebhookReport,
}

#[derive(Clone)]
struct WebhookServerState {
    runtime: SharedBurnBotRuntime,
    auth_token: Option<Arc<str>>,
}

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": code,
                "message": message.into(),
            }
        })),
    )
        .into_response()
}

/// Accepts the raw token or `Bearer <token>` in the `Authorization` header.
fn authorization_matches(headers: &HeaderMap, expected: &str) -> bool {
    let Some(value) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let value = value.trim();
    let presented = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    presented == expected
}

async fn handle_healthz() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "now_unix": Utc::now().timestamp(),
        })),
    )
}

async fn handle_webhook(
    State(state): State<WebhookServerState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if let Some(expected) = state.auth_token.as_deref() {
        if !authorization_matches(&headers, expected) {
            warn!("webhook rejected: authorization mismatch");
            return error_response(
                StatusCode::UNAUTHORIZED,
                "auth_failed",
                "missing or invalid webhook authorization",
            );
        }
    }

    let mut runtime = state.runtime.lock().await;
    match runtime.handle_webhook_body(&body).await {
        Ok(report) => (
            StatusCode::OK,
            Json(WebhookAccepted {
                status: "accepted",
                report,
            }),
        )
            .into_response(),
        Err(WebhookPayloadError::Malformed(error)) => {
            warn!(error = %error, body_bytes = body.len(), "webhook rejected: malformed payload");
            error_response(
                StatusCode::BAD_REQUEST,
                "malformed_payload",
                format!("webhook body is not valid JSON: {error}"),
            )
        }
    }
}

pub fn build_webhook_router(runtime: SharedBurnBotRuntime, auth_token: Option<&str>) -> Router {
    let state = WebhookServerState {
        runtime,
        auth_token: auth_token.map(Arc::from),
    };
    Router::new()
        .route(HEALTHZ_PATH, get(handle_healthz))
        .route(WEBHOOK_PATH, post(handle_webhook))
        .with_state(state)
}

/// Binds the webhook listener. Called before any other task starts so an
/// unusable address fails startup.
pub async fn bind_webhook_listener(bind: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind webhook server to {bind}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve webhook server address")?;
    info!(address = %local_addr, "webhook server listening");
    Ok(listener)
}

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve_webhooks<F>(
    listener: TcpListener,
    runtime: SharedBurnBotRuntime,
    auth_token: Option<&str>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(auth_required = auth_token.is_some(), "webhook server started");
    axum::serve(listener, build_webhook_router(runtime, auth_token))
        .with_graceful_shutdown(shutdown)
        .await
        .context("webhook server exited with an error")?;
    info!("webhook server stopped");
    Ok(())
}
