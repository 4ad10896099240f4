// src/tasks/security.rs — Security audit (scoring + single combined generation)
//
// State machine: CACHE_CHECK → {CACHED_RETURN | COMPUTE};
// COMPUTE → SCORE → LLM_CALL → {REPORT_BUILT → CACHE_WRITE | ERROR_REPORT}.

use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::infra::errors::OramindError;
use crate::retrieval::DocIndex;

use super::snapshots::{contains_ci, Snapshot};
use super::strip_code_fences;

pub const USERS_FILE: &str = "users.csv";
pub const ROLES_FILE: &str = "roles.csv";
pub const PRIVS_FILE: &str = "privs.csv";
pub const CACHE_FILE: &str = "last_audit_cache.json";
const PREVIOUS_FILE: &str = "previous_security.json";

const RETRIEVAL_QUERY: &str = "oracle security risks users roles privileges";
const RETRIEVAL_TOP_K: usize = 3;

pub const SCORE_FLOOR: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critique,
    Haute,
    Moyenne,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Risk {
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityReport {
    pub score: i64,
    pub risks: Vec<Risk>,
    pub recommendations: Vec<String>,
}

/// Audit outcome as an explicit sum type: callers must handle the degraded
/// path instead of relying on error propagation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SecurityAudit {
    Report(SecurityReport),
    Error { message: String, score: i64 },
}

/// Disk cache entry keyed by the newest snapshot modification time.
#[derive(Debug, Serialize, Deserialize)]
struct AuditCacheEntry {
    timestamp: u64,
    report: SecurityReport,
}

/// Deterministic exposure score, pure and independent of the LLM:
/// 100 minus 2 per open account, 10 per ANY privilege, 15 per DBA grant,
/// floored at 20.
pub fn security_score(open_users: usize, any_privs: usize, dba_grants: usize) -> i64 {
    let score =
        100 - 2 * open_users as i64 - 10 * any_privs as i64 - 15 * dba_grants as i64;
    score.max(SCORE_FLOOR)
}

/// Six-field combined answer: one call covers users, privileges and password
/// profiles, instead of three calls.
#[derive(Debug, Default, Deserialize)]
struct CombinedAnalysis {
    #[serde(default)]
    users_analysis: Option<String>,
    #[serde(default)]
    users_recommendation: Option<String>,
    #[serde(default)]
    privs_analysis: Option<String>,
    #[serde(default)]
    privs_recommendation: Option<String>,
    #[serde(default)]
    profile_analysis: Option<String>,
    #[serde(default)]
    profile_recommendation: Option<String>,
}

/// Run the full audit against the snapshot files in `data_dir`.
pub async fn audit_security(engine: &Engine, index: &DocIndex, data_dir: &Path) -> SecurityAudit {
    // CACHE_CHECK: reuse the last report when no snapshot changed since.
    let last_mtime = newest_snapshot_mtime(data_dir);
    if let Some(report) = load_cached_report(data_dir, last_mtime) {
        tracing::info!("security audit cache hit, skipping recompute");
        return SecurityAudit::Report(report);
    }

    // COMPUTE: load the three snapshots. No score exists yet on this path.
    let (users, roles, privs) = match load_snapshots(data_dir) {
        Ok(t) => t,
        Err(e) => {
            return SecurityAudit::Error {
                message: e.to_string(),
                score: 0,
            };
        }
    };

    let open_users = users.count_where("account_status", |v| v == "OPEN");
    let any_privs = privs.count_where("privilege", |v| contains_ci(v, "ANY"));
    let dba_grants = roles.count_where("granted_role", |v| contains_ci(v, "DBA"));

    // Keep the prompt bounded: interesting rows first, small head otherwise.
    let mut users_block = users.render_where("account_status", |v| v == "OPEN", 50);
    if open_users == 0 {
        users_block = users.render(20);
    }
    let roles_block = roles.render(50);
    let mut privs_block =
        privs.render_where("privilege", |v| contains_ci(v, "ANY") || contains_ci(v, "DBA"), 50);
    if privs_block.len() < 10 {
        privs_block = privs.render(20);
    }

    let previous_open = read_previous_open_count(data_dir).unwrap_or(open_users as i64);
    let change_note = format!(
        "Changes detected: {} open users added.",
        open_users as i64 - previous_open
    );

    let user_context = format!(
        "User base with {open_users} open users, {any_privs} ANY privileges, {dba_grants} DBA grants. \
         {change_note} DBA orientation: least privilege, auditing."
    );

    // SCORE
    let score = security_score(open_users, any_privs, dba_grants);

    let context = index.retrieve(RETRIEVAL_QUERY, RETRIEVAL_TOP_K).join("\n");

    let instruction = format!(
        "Analyze the security of this Oracle database.\n\n\
         USER DATA:\n{users_block}\n\n\
         ROLE DATA:\n{roles_block}\n\n\
         PRIVILEGE DATA:\n{privs_block}\n\n\
         Instructions:\n\
         1. Analyze the risks tied to users/roles.\n\
         2. Analyze excessive privileges.\n\
         3. Check password profiles (FAILED_LOGIN_ATTEMPTS, etc).\n\n\
         ANSWER ONLY WITH VALID JSON of the form:\n\
         {{\n\
           \"users_analysis\": \"Critical analysis of the users...\",\n\
           \"users_recommendation\": \"Concrete fix (e.g. lock user X, revoke role Y)...\",\n\
           \"privs_analysis\": \"Privilege analysis...\",\n\
           \"privs_recommendation\": \"Concrete privilege action...\",\n\
           \"profile_analysis\": \"Profile analysis...\",\n\
           \"profile_recommendation\": \"Concrete profile action...\"\n\
         }}"
    );

    // LLM_CALL. The deterministic score is kept on the failure path: it does
    // not depend on the call that failed.
    let analysis = match engine
        .generate(&instruction, Some(&context), Some(&user_context))
        .await
        .and_then(|response| parse_combined_analysis(&response))
    {
        Ok(a) => a,
        Err(e) if e.is_rate_limit() => {
            return SecurityAudit::Error {
                message: "LLM quota exceeded (429). Wait a minute and retry.".into(),
                score,
            };
        }
        Err(e) => {
            return SecurityAudit::Error {
                message: format!("Partial analysis error: {e}"),
                score,
            };
        }
    };

    // REPORT_BUILT
    let rec_users = analysis
        .users_recommendation
        .unwrap_or_else(|| "Review the user accounts".into());
    let rec_privs = analysis
        .privs_recommendation
        .unwrap_or_else(|| "Apply the principle of least privilege".into());
    let rec_profile = analysis
        .profile_recommendation
        .unwrap_or_else(|| "Harden the password policies".into());

    let report = SecurityReport {
        score,
        risks: vec![
            Risk {
                severity: Severity::Critique,
                description: analysis
                    .users_analysis
                    .unwrap_or_else(|| "No analysis".into())
                    .trim()
                    .to_string(),
                recommendation: rec_users.trim().to_string(),
            },
            Risk {
                severity: Severity::Haute,
                description: analysis
                    .privs_analysis
                    .unwrap_or_else(|| "No analysis".into())
                    .trim()
                    .to_string(),
                recommendation: rec_privs.trim().to_string(),
            },
            Risk {
                severity: Severity::Moyenne,
                description: analysis
                    .profile_analysis
                    .unwrap_or_else(|| "No analysis".into())
                    .trim()
                    .to_string(),
                recommendation: rec_profile.trim().to_string(),
            },
        ],
        recommendations: vec![
            rec_users.trim().to_string(),
            rec_privs.trim().to_string(),
            rec_profile.trim().to_string(),
        ],
    };

    // CACHE_WRITE: persistence failures are logged, never fatal.
    write_previous_open_count(data_dir, open_users);
    write_cached_report(data_dir, &report);

    SecurityAudit::Report(report)
}

fn parse_combined_analysis(response: &str) -> Result<CombinedAnalysis, OramindError> {
    serde_json::from_str(strip_code_fences(response)).map_err(|e| {
        OramindError::MalformedResponse {
            task: "security".into(),
            message: e.to_string(),
        }
    })
}

fn load_snapshots(data_dir: &Path) -> Result<(Snapshot, Snapshot, Snapshot), OramindError> {
    Ok((
        Snapshot::load(&data_dir.join(USERS_FILE))?,
        Snapshot::load(&data_dir.join(ROLES_FILE))?,
        Snapshot::load(&data_dir.join(PRIVS_FILE))?,
    ))
}

/// Newest modification time (unix seconds) across the snapshot files that
/// exist; 0 when none do.
fn newest_snapshot_mtime(data_dir: &Path) -> u64 {
    [USERS_FILE, ROLES_FILE, PRIVS_FILE]
        .iter()
        .filter_map(|f| file_mtime(&data_dir.join(f)))
        .max()
        .unwrap_or(0)
}

fn file_mtime(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()?
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

/// Cached report, valid only while no snapshot is newer than it.
fn load_cached_report(data_dir: &Path, last_mtime: u64) -> Option<SecurityReport> {
    let raw = std::fs::read_to_string(data_dir.join(CACHE_FILE)).ok()?;
    let entry: AuditCacheEntry = match serde_json::from_str(&raw) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!("audit cache unreadable: {e}");
            return None;
        }
    };
    (entry.timestamp >= last_mtime).then_some(entry.report)
}

fn write_cached_report(data_dir: &Path, report: &SecurityReport) {
    let entry = AuditCacheEntry {
        timestamp: chrono::Utc::now().timestamp().max(0) as u64,
        report: report.clone(),
    };
    if let Err(e) = serde_json::to_string(&entry)
        .map_err(anyhow::Error::from)
        .and_then(|json| std::fs::write(data_dir.join(CACHE_FILE), json).map_err(Into::into))
    {
        tracing::warn!("audit cache write failed: {e}");
    }
}

fn read_previous_open_count(data_dir: &Path) -> Option<i64> {
    let raw = std::fs::read_to_string(data_dir.join(PREVIOUS_FILE)).ok()?;
    let v: serde_json::Value = serde_json::from_str(&raw).ok()?;
    v["open_users"].as_i64()
}

fn write_previous_open_count(data_dir: &Path, open_users: usize) {
    let json = serde_json::json!({ "open_users": open_users }).to_string();
    if let Err(e) = std::fs::write(data_dir.join(PREVIOUS_FILE), json) {
        tracing::warn!("previous-count write failed: {e}");
    }
}
