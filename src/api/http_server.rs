use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};

use super::classify::classify_handler;
use crate::config::ServiceConfig;
use crate::version;
use crate::vision::OcrEngine;

/// Headroom on top of the configured upload limit for multipart framing;
/// the exact per-file limit is enforced in the handler so the 413 carries
/// the service's JSON error shape.
const BODY_LIMIT_HEADROOM: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    /// Process-wide OCR engine handle. `None` means startup initialization
    /// failed and every request fails fast with 503.
    pub engine: Option<Arc<dyn OcrEngine>>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(engine: Option<Arc<dyn OcrEngine>>, config: ServiceConfig) -> Self {
        Self {
            engine,
            config: Arc::new(config),
        }
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + BODY_LIMIT_HEADROOM;

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/v1/classify", post(classify_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.api_port));
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    "Document Classifier API is running"
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state
        .engine
        .as_ref()
        .map(|e| e.name())
        .unwrap_or("unavailable");

    axum::response::Json(json!({
        "status": "ok",
        "engine": engine,
        "version": version::VERSION_NUMBER,
    }))
}
