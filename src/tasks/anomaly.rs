// src/tasks/anomaly.rs — Batched audit-log anomaly classification

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::infra::errors::OramindError;
use crate::retrieval::DocIndex;

use super::strip_code_fences;

/// Cap on records per batch, to bound the context window and API usage.
const MAX_BATCH: usize = 10;

const RETRIEVAL_QUERY: &str = "oracle audit anomaly sql injection";
const RETRIEVAL_TOP_K: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Normal,
    Suspect,
    Critique,
    /// Anything the model answers outside the expected set.
    #[default]
    Inconnu,
}

impl<'de> Deserialize<'de> for Classification {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_ascii_lowercase().as_str() {
            "normal" => Classification::Normal,
            "suspect" => Classification::Suspect,
            "critique" => Classification::Critique,
            _ => Classification::Inconnu,
        })
    }
}

/// One log record merged with the model's verdict.
#[derive(Debug, Clone, Serialize)]
pub struct AnomalyFinding {
    pub log: serde_json::Value,
    pub classification: Classification,
    pub justification: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct AnomalyStats {
    pub total_logs: usize,
    pub errors: u32,
}

/// Shape of one element in the model's JSON-array answer.
#[derive(Debug, Deserialize)]
struct BatchVerdict {
    #[serde(default)]
    log_index: Option<i64>,
    #[serde(default)]
    classification: Classification,
    #[serde(default)]
    justification: String,
}

/// Classify the most recent log records in a single batched call.
///
/// The whole batch failing is a non-fatal statistics error: the result list
/// is empty and `stats.errors` is set, the caller keeps running.
pub async fn detect_anomalies(
    engine: &Engine,
    index: &DocIndex,
    log_file: &Path,
) -> (Vec<AnomalyFinding>, AnomalyStats) {
    let mut stats = AnomalyStats::default();

    let logs: Vec<serde_json::Value> = match std::fs::read_to_string(log_file)
        .map_err(OramindError::from)
        .and_then(|raw| {
            serde_json::from_str(&raw).map_err(|e| OramindError::MalformedResponse {
                task: "anomaly".into(),
                message: format!("unreadable log file: {e}"),
            })
        }) {
        Ok(logs) => logs,
        Err(e) => {
            tracing::error!("Cannot read {}: {e}", log_file.display());
            return (Vec::new(), stats);
        }
    };
    stats.total_logs = logs.len();

    if logs.is_empty() {
        return (Vec::new(), stats);
    }

    let batch = &logs[..logs.len().min(MAX_BATCH)];
    let logs_block = serde_json::to_string_pretty(batch).unwrap_or_default();

    let user_context = format!(
        "Audit trail with {} logs. DBA focus: SQL injection, privilege escalation, off-hours access.",
        logs.len()
    );
    let context = index.retrieve(RETRIEVAL_QUERY, RETRIEVAL_TOP_K).join("\n");

    let instruction = format!(
        "Analyze the {} Oracle audit logs below.\n\
         For EACH log, decide whether it is 'normal', 'suspect' or 'critique'.\n\
         LOGS:\n{logs_block}\n\n\
         ANSWER ONLY with a JSON array of the form:\n\
         [{{\"log_index\": 0, \"classification\": \"critique\", \"justification\": \"...\"}}, ...]",
        batch.len()
    );

    match engine
        .generate(&instruction, Some(&context), Some(&user_context))
        .await
    {
        Ok(response) => match merge_batch_response(&response, batch) {
            Ok(findings) => (findings, stats),
            Err(e) => {
                tracing::error!("Batch classification parse failed: {e}");
                stats.errors = 1;
                (Vec::new(), stats)
            }
        },
        Err(e) => {
            tracing::error!("Batch classification call failed: {e}");
            stats.errors = 1;
            (Vec::new(), stats)
        }
    }
}

/// Parse the model's JSON array and merge each verdict with its source log.
/// Verdicts whose index is missing or out of range are silently dropped.
pub fn merge_batch_response(
    response: &str,
    batch: &[serde_json::Value],
) -> Result<Vec<AnomalyFinding>, OramindError> {
    let cleaned = strip_code_fences(response);
    let verdicts: Vec<BatchVerdict> =
        serde_json::from_str(cleaned).map_err(|e| OramindError::MalformedResponse {
            task: "anomaly".into(),
            message: e.to_string(),
        })?;

    let findings = verdicts
        .into_iter()
        .filter_map(|v| {
            let idx = v.log_index?;
            if idx < 0 || idx as usize >= batch.len() {
                return None;
            }
            Some(AnomalyFinding {
                log: batch[idx as usize].clone(),
                classification: v.classification,
                justification: v.justification,
            })
        })
        .collect();

    Ok(findings)
}
