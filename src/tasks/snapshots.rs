// src/tasks/snapshots.rs — Extraction snapshot loading
//
// The extraction job drops plain unquoted CSV files (users.csv, roles.csv,
// privs.csv) into the data directory; this module reads them into a small
// header-aware table used for counting and prompt embedding.

use std::path::Path;

use crate::infra::errors::OramindError;

/// One loaded CSV snapshot: a header row plus data rows.
#[derive(Debug, Clone)]
pub struct Snapshot {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self, OramindError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::parse(&raw))
    }

    /// Oracle extraction output is plain CSV without quoting or embedded
    /// separators, so a line/comma split is sufficient.
    pub fn parse(raw: &str) -> Self {
        let mut lines = raw.lines().filter(|l| !l.trim().is_empty());
        let headers: Vec<String> = lines
            .next()
            .map(|h| h.split(',').map(|c| c.trim().to_string()).collect())
            .unwrap_or_default();
        let rows = lines
            .map(|l| l.split(',').map(|c| c.trim().to_string()).collect())
            .collect();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Count rows whose named column satisfies the predicate. A missing
    /// column counts as zero matches.
    pub fn count_where(&self, column: &str, pred: impl Fn(&str) -> bool) -> usize {
        let Some(idx) = self.column_index(column) else {
            return 0;
        };
        self.rows
            .iter()
            .filter(|r| r.get(idx).is_some_and(|v| pred(v)))
            .count()
    }

    /// Render up to `limit` rows (header included) for prompt embedding.
    pub fn render(&self, limit: usize) -> String {
        self.render_rows(self.rows.iter().take(limit))
    }

    /// Render up to `limit` rows matching the predicate on the named column.
    pub fn render_where(
        &self,
        column: &str,
        pred: impl Fn(&str) -> bool,
        limit: usize,
    ) -> String {
        let Some(idx) = self.column_index(column) else {
            return self.render_rows(std::iter::empty());
        };
        self.render_rows(
            self.rows
                .iter()
                .filter(|r| r.get(idx).is_some_and(|v| pred(v)))
                .take(limit),
        )
    }

    fn render_rows<'a>(&self, rows: impl Iterator<Item = &'a Vec<String>>) -> String {
        let mut out = self.headers.join("  ");
        for row in rows {
            out.push('\n');
            out.push_str(&row.join("  "));
        }
        out
    }
}

/// Case-insensitive substring match, the shape of every snapshot predicate.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const USERS_CSV: &str = "username,account_status\nSYS,OPEN\nSCOTT,LOCKED\nAPP,OPEN\n";

    #[test]
    fn test_parse_and_count() {
        let snap = Snapshot::parse(USERS_CSV);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.count_where("account_status", |v| v == "OPEN"), 2);
        assert_eq!(snap.count_where("missing_column", |_| true), 0);
    }

    #[test]
    fn test_render_where_limits() {
        let snap = Snapshot::parse(USERS_CSV);
        let rendered = snap.render_where("account_status", |v| v == "OPEN", 1);
        assert_eq!(rendered, "username  account_status\nSYS  OPEN");
    }

    #[test]
    fn test_render_includes_header() {
        let snap = Snapshot::parse(USERS_CSV);
        assert!(snap.render(50).starts_with("username  account_status"));
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("GRANT ANY TABLE", "any"));
        assert!(contains_ci("dba_role", "DBA"));
        assert!(!contains_ci("SELECT", "DBA"));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let snap = Snapshot::parse("a,b\n\n1,2\n\n");
        assert_eq!(snap.len(), 1);
    }
}
