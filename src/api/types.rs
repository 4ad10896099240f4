// src/api/types.rs

use serde::{Deserialize, Serialize};

use crate::tasks::anomaly::{AnomalyFinding, AnomalyStats};

/// Request body for backup recommendation.
#[derive(Debug, Clone, Deserialize)]
pub struct BackupRequest {
    #[serde(default = "default_rpo")]
    pub rpo: String,
    #[serde(default = "default_rto")]
    pub rto: String,
    #[serde(default = "default_budget")]
    pub budget: String,
}

fn default_rpo() -> String {
    "4h".into()
}

fn default_rto() -> String {
    "2h".into()
}

fn default_budget() -> String {
    "medium".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeRequest {
    pub sql: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
}

/// Chat answers always come back in this shape, errors included, for
/// dashboard compatibility.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
}

/// Request body for the provider hot-swap endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineRequest {
    pub provider: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EngineInstalled {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct AnomalyReply {
    pub results: Vec<AnomalyFinding>,
    pub stats: AnomalyStats,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
