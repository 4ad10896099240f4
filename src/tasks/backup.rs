// src/tasks/backup.rs — Backup strategy recommendation (dual generation)

use serde::Serialize;

use crate::engine::Engine;
use crate::infra::errors::OramindError;
use crate::retrieval::DocIndex;

const RETRIEVAL_QUERY: &str = "oracle backup rman rpo rto";
const RETRIEVAL_TOP_K: usize = 3;

/// Synthetic description of the database's scale, shared by both calls.
const SCALE_CONTEXT: &str =
    "Critical 1GB database, 50 tables. Note changes since the last backup (e.g. new tables).";

#[derive(Debug, Clone, Serialize)]
pub struct BackupPlan {
    pub strategy: String,
    pub script: String,
}

/// Recommend a backup strategy and matching RMAN script for the given
/// objectives.
///
/// Both generations are dispatched before either is awaited and both must
/// complete — a join, never a race. Errors propagate to the boundary.
pub async fn recommend_backup(
    engine: &Engine,
    index: &DocIndex,
    rpo: &str,
    rto: &str,
    budget: &str,
) -> Result<BackupPlan, OramindError> {
    let context = index.retrieve(RETRIEVAL_QUERY, RETRIEVAL_TOP_K).join("\n");

    let strategy_instruction = format!(
        "Recommend an RMAN strategy for RPO:{rpo}, RTO:{rto}, Budget:{budget}. DBA orientation."
    );
    let script_instruction =
        format!("Write only a complete RMAN script that satisfies RPO:{rpo} and RTO:{rto}.");

    let (strategy, script) = tokio::join!(
        engine.generate(&strategy_instruction, Some(&context), Some(SCALE_CONTEXT)),
        engine.generate(&script_instruction, Some(&context), Some(SCALE_CONTEXT)),
    );

    Ok(BackupPlan {
        strategy: strategy?.trim().to_string(),
        script: script?.trim().to_string(),
    })
}
