//! HTTP server
//!
//! Exposes the pipeline as `GET /scrape/webpage?url=...`. Success is an HTML
//! body; every failure is a JSON object `{"detail": "..."}`.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use pagesum::{PageSummarizer, SummarizeError};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pipeline: PageSummarizer,
}

impl AppState {
    pub fn new(pipeline: PageSummarizer) -> Self {
        Self { pipeline }
    }
}

#[derive(Debug, Deserialize)]
struct ScrapeParams {
    url: Option<String>,
}

/// Error body returned to callers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<SummarizeError> for ApiError {
    fn from(err: SummarizeError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        } else {
            warn!(error = %err, "Request rejected");
        }
        Self {
            status,
            detail: err.public_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/scrape/webpage", get(scrape_webpage))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn scrape_webpage(
    State(state): State<AppState>,
    params: Result<Query<ScrapeParams>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let url = params
        .url
        .ok_or_else(|| ApiError::bad_request("missing required query parameter: url"))?;

    let summary = state.pipeline.summarize(&url).await?;
    Ok(Html(summary.html))
}

/// Bind and serve until Ctrl-C
pub async fn run_server(bind: SocketAddr, pipeline: PageSummarizer) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(AppState::new(pipeline)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl-C handler");
        // Never resolve: keep serving without graceful shutdown
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
