/// HTTP API server for the gateway.
///
/// Exposes the chat and summary pipelines as JSON endpoints. Each request
/// runs its pipeline to completion independently; the only shared state is
/// the pipelines themselves behind `Arc`.
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::ErrorKind;
use crate::pipeline::{ChatPipeline, PipelineError, Stage, SummaryPipeline};

/// Worst-case wire bytes per message byte: a control character is sent as `\u00XX`.
const JSON_ESCAPE_FACTOR: usize = 6;

/// Headroom over the escaped message for JSON framing.
const BODY_LIMIT_OVERHEAD: usize = 4096;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct GatewayState {
    chat: Arc<ChatPipeline>,
    summary: Arc<SummaryPipeline>,
    max_message_bytes: usize,
}

impl GatewayState {
    pub fn new(chat: ChatPipeline, summary: SummaryPipeline, max_message_bytes: usize) -> Self {
        Self {
            chat: Arc::new(chat),
            summary: Arc::new(summary),
            max_message_bytes,
        }
    }
}

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Request body for POST /summarize.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
}

/// Error response body. The detailed cause stays in the server log.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl ErrorResponse {
    fn message_too_large() -> Self {
        Self {
            error: "message too large".to_string(),
            stage: None,
            kind: None,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: "request failed".to_string(),
            stage: Some(self.stage),
            kind: Some(self.kind),
        };
        (status_for(&self), Json(body)).into_response()
    }
}

pub(crate) fn status_for(err: &PipelineError) -> StatusCode {
    match err.kind {
        ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Transport if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Transport | ErrorKind::Upstream | ErrorKind::Schema => StatusCode::BAD_GATEWAY,
    }
}

/// Build the HTTP API router.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state
        .max_message_bytes
        .saturating_mul(JSON_ESCAPE_FACTOR)
        .saturating_add(BODY_LIMIT_OVERHEAD);
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/summarize", post(summarize_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn too_large(route: &str, request_id: &str, len: usize) -> Response {
    warn!(
        "{} {}: payload too large ({} bytes)",
        route, request_id, len
    );
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Json(ErrorResponse::message_too_large()),
    )
        .into_response()
}

/// POST /chat: run one chat turn.
async fn chat_handler(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    let request_id = format!("http-{}", Uuid::new_v4());
    if body.message.len() > state.max_message_bytes {
        return too_large("chat", &request_id, body.message.len());
    }

    debug!(
        "chat {}: content_len={}",
        request_id,
        body.message.len()
    );

    match state.chat.run(&body.message).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            error!("chat {} failed: {}", request_id, e);
            e.into_response()
        }
    }
}

/// POST /summarize: summarize one document.
async fn summarize_handler(
    State(state): State<GatewayState>,
    Json(body): Json<SummarizeRequest>,
) -> Response {
    let request_id = format!("http-{}", Uuid::new_v4());
    if body.text.len() > state.max_message_bytes {
        return too_large("summarize", &request_id, body.text.len());
    }

    debug!("summarize {}: content_len={}", request_id, body.text.len());

    match state.summary.run(&body.text).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            error!("summarize {} failed: {}", request_id, e);
            e.into_response()
        }
    }
}

/// GET /api/health: health check endpoint.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Start the HTTP API server.
pub async fn start(
    host: &str,
    port: u16,
    state: GatewayState,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP API listening on {}", addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP API server error: {}", e);
        }
    });

    Ok(handle)
}
