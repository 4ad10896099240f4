// src/retrieval/mod.rs — Ranked snippet retrieval over the built-in docs corpus
//
// Stand-in for a full vector index: term-overlap scoring over a small corpus
// of Oracle operations notes. Infallible by contract — callers always get a
// sequence of snippets, a placeholder when the index is unavailable.

/// Fallback snippet handed out when no index is available.
pub const PLACEHOLDER_SNIPPET: &str = "(retrieval unavailable - generic context used)";

/// Seed corpus of Oracle tuning / security / backup / anomaly notes.
const SEED_DOCS: &[&str] = &[
    "Oracle tuning: use indexes to avoid full table scans.",
    "Best practice: add hints like /*+ INDEX */ for query optimization.",
    "Security: apply the principle of least privilege - avoid GRANT ANY.",
    "Anomalies: watch for logins outside business hours.",
    "Optimization patterns: rewrite subqueries to joins for better performance.",
    "Security patterns: set password expiration to 90 days.",
    "Anomaly patterns: SQL injection looks like ' OR ''=' in queries.",
    "Backup: use RMAN for incremental backups.",
    "Restore: use FLASHBACK for point-in-time recovery.",
    "Performance: monitor V$SQLSTAT for slow queries.",
    "Audit: enable unified auditing for better logs.",
    "Roles: avoid the default DBA role for application users.",
    "Privileges: revoke unnecessary system privileges.",
    "Profiles: set FAILED_LOGIN_ATTEMPTS to 5.",
    "Events: monitor wait events in V$SYSTEM_EVENT.",
    "Index: create B-tree indexes on frequently filtered columns.",
    "Hints: use /*+ PARALLEL */ for large queries.",
    "Escalation: detect GRANT statements on critical roles.",
    "Injection: look for -- or ; in audit actions.",
    "RTO/RPO: for a critical database, aim for RPO under one hour.",
    "Security risk: PUBLIC has EXECUTE on dangerous packages like UTL_FILE, UTL_HTTP.",
    "Never grant CREATE ANY PROCEDURE to application users.",
    "Use Oracle Vault or TDE for sensitive data encryption.",
    "Monitor failed logins for brute-force attacks.",
    "Use Database Vault to separate duties.",
    "Flashback table requires undo retention and row movement.",
    "Point-in-time recovery requires archive log mode.",
    "Use incremental level 0 + level 1 for efficient backups.",
    "Validate RMAN backups with RESTORE VALIDATE.",
    "Use BLOCK CHANGE TRACKING for faster incremental backups.",
    "Performance: avoid functions on indexed columns in WHERE clauses.",
    "Use bind variables to avoid hard parsing.",
    "Gather statistics regularly with DBMS_STATS.",
    "Use RESULT_CACHE for repetitive queries.",
    "Partition large tables for better performance and maintenance.",
];

/// In-memory document index with relevance-ranked lookup.
pub struct DocIndex {
    docs: Vec<String>,
}

impl Default for DocIndex {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DocIndex {
    /// Index seeded with the built-in corpus.
    pub fn builtin() -> Self {
        Self {
            docs: SEED_DOCS.iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn from_docs(docs: Vec<String>) -> Self {
        Self { docs }
    }

    /// Relevance-ranked snippets for the query, best first, ties in corpus
    /// order. Never fails: an empty index yields a single placeholder.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<String> {
        if self.docs.is_empty() {
            return vec![PLACEHOLDER_SNIPPET.to_string()];
        }

        let query_terms: Vec<String> = tokenize(query);
        let mut scored: Vec<(usize, usize)> = self
            .docs
            .iter()
            .enumerate()
            .map(|(i, doc)| (score(&query_terms, doc), i))
            .collect();
        // stable sort keeps corpus order for equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(top_k)
            .map(|(_, i)| self.docs[i].clone())
            .collect()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(|t| t.to_string())
        .collect()
}

fn score(query_terms: &[String], doc: &str) -> usize {
    let doc_terms = tokenize(doc);
    query_terms
        .iter()
        .filter(|t| doc_terms.iter().any(|d| d == *t))
        .count()
}
