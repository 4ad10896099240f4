// src/tasks/optimizer.rs — Slow-query optimization advice (triple generation)

use serde::Serialize;

use crate::engine::Engine;
use crate::infra::errors::OramindError;
use crate::retrieval::DocIndex;

const RETRIEVAL_TOP_K: usize = 3;
const MAX_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct QueryAdvice {
    pub explanation: String,
    pub costly_points: String,
    pub recommendations: Vec<String>,
    pub before_cost: String,
    pub after_cost: String,
}

/// Analyze a slow SQL statement with three concurrent generations sharing one
/// retrieved context: why it is slow, the costliest aspects, and concrete
/// optimizations. Errors propagate to the boundary.
pub async fn optimize_query(
    engine: &Engine,
    index: &DocIndex,
    sql: &str,
    plan_hint: &str,
) -> Result<QueryAdvice, OramindError> {
    let head: String = sql.chars().take(100).collect();
    let query = format!("oracle query optimization {head}");
    let context = index.retrieve(&query, RETRIEVAL_TOP_K).join("\n");

    let explanation_instruction =
        format!("Explain why this Oracle query is slow:\n{sql}\nPlan: {plan_hint}");
    let costly_instruction =
        format!("What are the 3 costliest aspects of this query?\n{sql}");
    let recommendations_instruction = format!(
        "Propose 3 concrete optimizations (index, hint, rewrite) for this query:\n{sql}"
    );

    let (explanation, costly, recommendations_text) = tokio::join!(
        engine.generate(&explanation_instruction, Some(&context), None),
        engine.generate(&costly_instruction, Some(&context), None),
        engine.generate(&recommendations_instruction, Some(&context), None),
    );

    Ok(QueryAdvice {
        explanation: explanation?.trim().to_string(),
        costly_points: costly?.trim().to_string(),
        recommendations: parse_recommendations(&recommendations_text?),
        before_cost: "High".into(),
        after_cost: "Reduced (estimated)".into(),
    })
}

/// Best-effort plain-text parse: one recommendation per non-empty line,
/// truncated to three. Inconsistent model formatting may yield fewer — that
/// is accepted rather than retried.
pub fn parse_recommendations(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(MAX_RECOMMENDATIONS)
        .map(str::to_string)
        .collect()
}
