// src/api/mod.rs — HTTP surface for the dashboard and external callers

pub mod handlers;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::engine::EngineRegistry;
use crate::infra::config::{ApiSettings, EngineSettings};
use crate::retrieval::DocIndex;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<EngineRegistry>,
    pub index: Arc<DocIndex>,
    /// Base settings used when constructing a replacement engine.
    pub settings: EngineSettings,
    /// Directory holding the extraction snapshots and audit caches.
    pub data_dir: PathBuf,
    /// Audit log file consumed by the anomaly batch.
    pub log_file: PathBuf,
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    // Dashboard runs on a separate dev origin; keep CORS permissive.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/security", get(handlers::security_report))
        .route("/api/v1/anomalies", get(handlers::anomalies))
        .route("/api/v1/backup/recommend", post(handlers::recommend_backup))
        .route("/api/v1/performance/optimize", post(handlers::optimize))
        .route("/api/v1/chat", post(handlers::chat))
        .route("/api/v1/engine", post(handlers::install_engine))
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the given port (blocking).
pub async fn start_server(settings: &ApiSettings, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{}", settings.port);
    let router = build_router(state);

    tracing::info!("API server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
