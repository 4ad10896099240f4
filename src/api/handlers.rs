// src/api/handlers.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::{types::*, ApiState};
use crate::engine::Engine;
use crate::tasks::{anomaly, backup, optimizer, security};

const CHAT_RETRIEVAL_TOP_K: usize = 3;
const CHAT_PERSONA: &str =
    "You are an expert Oracle DBA. Answer clearly, structured and professional.";

/// GET /api/v1/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/v1/security — run (or reuse) the security audit.
pub async fn security_report(State(state): State<ApiState>) -> Json<security::SecurityAudit> {
    let engine = state.registry.current();
    let audit = security::audit_security(&engine, &state.index, &state.data_dir).await;
    Json(audit)
}

/// GET /api/v1/anomalies — batched log classification, capped at 10 results.
pub async fn anomalies(State(state): State<ApiState>) -> Json<AnomalyReply> {
    let engine = state.registry.current();
    let (mut results, stats) =
        anomaly::detect_anomalies(&engine, &state.index, &state.log_file).await;
    results.truncate(10);
    Json(AnomalyReply { results, stats })
}

/// POST /api/v1/backup/recommend
pub async fn recommend_backup(
    State(state): State<ApiState>,
    Json(body): Json<BackupRequest>,
) -> Result<Json<backup::BackupPlan>, (StatusCode, Json<ErrorResponse>)> {
    let engine = state.registry.current();
    backup::recommend_backup(&engine, &state.index, &body.rpo, &body.rto, &body.budget)
        .await
        .map(Json)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Recommendation failed: {e}"),
                }),
            )
        })
}

/// POST /api/v1/performance/optimize
pub async fn optimize(
    State(state): State<ApiState>,
    Json(body): Json<OptimizeRequest>,
) -> Result<Json<optimizer::QueryAdvice>, (StatusCode, Json<ErrorResponse>)> {
    let engine = state.registry.current();
    optimizer::optimize_query(
        &engine,
        &state.index,
        &body.sql,
        "Likely plan with full table scan or missing index",
    )
    .await
    .map(Json)
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Optimization failed: {e}"),
            }),
        )
    })
}

/// POST /api/v1/chat — RAG-grounded free-form question. Always answers with
/// a `response` body; LLM failures become an apology, never a 500.
pub async fn chat(State(state): State<ApiState>, Json(body): Json<ChatRequest>) -> Json<ChatReply> {
    let query = body.query.trim();
    if query.is_empty() {
        tracing::warn!("empty chat query received");
        return Json(ChatReply {
            response: "Ask me a real question about your Oracle database!".into(),
        });
    }

    let engine = state.registry.current();
    let context = state.index.retrieve(query, CHAT_RETRIEVAL_TOP_K).join("\n");

    match engine
        .generate(query, Some(&context), Some(CHAT_PERSONA))
        .await
    {
        Ok(text) => Json(ChatReply {
            response: text.trim().to_string(),
        }),
        Err(e) => {
            tracing::error!("chat generation failed: {e}");
            Json(ChatReply {
                response: format!(
                    "Sorry, an error occurred: {e}. Retry or contact support."
                ),
            })
        }
    }
}

/// POST /api/v1/engine — construct a new engine and install it process-wide.
/// In-flight calls finish against the engine they captured.
pub async fn install_engine(
    State(state): State<ApiState>,
    Json(body): Json<EngineRequest>,
) -> Result<Json<EngineInstalled>, (StatusCode, Json<ErrorResponse>)> {
    let mut settings = state.settings.clone();
    settings.provider = body.provider.clone();
    match body.provider.to_ascii_lowercase().as_str() {
        "groq" => settings.groq_api_key = body.api_key.or(settings.groq_api_key),
        "gemini" => settings.gemini_api_key = body.api_key.or(settings.gemini_api_key),
        _ => {}
    }

    let engine = Engine::from_settings(&settings).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let installed = state.registry.install(engine);
    Ok(Json(EngineInstalled {
        message: format!("LLM configured: {}", installed.provider_name()),
        status: "success".into(),
    }))
}
