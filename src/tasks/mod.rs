// src/tasks/mod.rs — Task orchestrators above the engine facade

pub mod anomaly;
pub mod backup;
pub mod optimizer;
pub mod security;
pub mod snapshots;

/// Models routinely wrap JSON answers in markdown fences; strip them before
/// parsing.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
