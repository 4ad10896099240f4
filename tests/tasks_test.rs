// tests/tasks_test.rs — Orchestrators over a mock provider

mod common;

use common::MockProvider;
use oramind::engine::Engine;
use oramind::provider::ProviderKind;
use oramind::retrieval::DocIndex;
use oramind::tasks::anomaly::{self, Classification};
use oramind::tasks::{backup, optimizer};

fn engine_with(mock: std::sync::Arc<MockProvider>) -> Engine {
    Engine::with_provider(ProviderKind::Groq, mock)
}

// ─── Backup ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_backup_returns_both_strategy_and_script() {
    let mock = MockProvider::with(|prompt| {
        if prompt.contains("RMAN script") {
            Ok("RUN { BACKUP INCREMENTAL LEVEL 0 DATABASE; }".into())
        } else {
            Ok("Weekly level 0, daily level 1 incremental.".into())
        }
    });
    let engine = engine_with(mock.clone());
    let index = DocIndex::builtin();

    let plan = backup::recommend_backup(&engine, &index, "4h", "2h", "medium")
        .await
        .unwrap();

    assert!(!plan.strategy.is_empty());
    assert!(!plan.script.is_empty());
    assert!(plan.script.contains("BACKUP"));
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_backup_joins_both_calls_even_when_one_fails() {
    // strategy fails immediately; the script call must still run to completion
    let mock = MockProvider::with(|prompt| {
        if prompt.contains("RMAN script") {
            Ok("RUN { BACKUP DATABASE; }".into())
        } else {
            Err(oramind::infra::errors::OramindError::Provider {
                provider: "mock".into(),
                message: "boom".into(),
            })
        }
    });
    let engine = engine_with(mock.clone());
    let index = DocIndex::builtin();

    let result = backup::recommend_backup(&engine, &index, "1h", "1h", "high").await;

    assert!(result.is_err());
    assert_eq!(mock.call_count(), 2, "join semantics: both calls dispatched");
}

// ─── Query optimization ─────────────────────────────────────────

#[tokio::test]
async fn test_optimizer_truncates_recommendations_to_three() {
    let mock = MockProvider::with(|prompt| {
        if prompt.contains("Propose 3 concrete optimizations") {
            Ok("a\n\nb\nc\nd".into())
        } else {
            Ok("analysis text".into())
        }
    });
    let engine = engine_with(mock.clone());
    let index = DocIndex::builtin();

    let advice = optimizer::optimize_query(&engine, &index, "SELECT * FROM t", "")
        .await
        .unwrap();

    assert_eq!(advice.recommendations, vec!["a", "b", "c"]);
    assert_eq!(advice.explanation, "analysis text");
    assert_eq!(advice.costly_points, "analysis text");
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_optimizer_accepts_sparse_model_formatting() {
    let mock = MockProvider::with(|prompt| {
        if prompt.contains("Propose 3 concrete optimizations") {
            Ok("Add an index on t.col\n".into())
        } else {
            Ok("x".into())
        }
    });
    let engine = engine_with(mock);
    let index = DocIndex::builtin();

    let advice = optimizer::optimize_query(&engine, &index, "SELECT 1", "hint")
        .await
        .unwrap();

    // fewer than three is a tolerated outcome, not an error
    assert_eq!(advice.recommendations, vec!["Add an index on t.col"]);
}

// ─── Anomaly classification ─────────────────────────────────────

fn write_logs(dir: &std::path::Path, count: usize) -> std::path::PathBuf {
    let logs: Vec<serde_json::Value> = (0..count)
        .map(|i| serde_json::json!({"id": i, "action": "LOGON", "user": "SCOTT"}))
        .collect();
    let path = dir.join("synthetic_logs.json");
    std::fs::write(&path, serde_json::to_string(&logs).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn test_anomaly_merges_valid_indices_only() {
    let tmp = tempfile::tempdir().unwrap();
    let log_file = write_logs(tmp.path(), 5);

    let mock = MockProvider::replying(
        r#"[{"log_index": 1, "classification": "critique", "justification": "x"},
            {"log_index": 9, "classification": "suspect", "justification": "y"}]"#,
    );
    let engine = engine_with(mock);
    let index = DocIndex::builtin();

    let (results, stats) = anomaly::detect_anomalies(&engine, &index, &log_file).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].classification, Classification::Critique);
    assert_eq!(results[0].log["id"], 1);
    assert_eq!(stats.total_logs, 5);
    assert_eq!(stats.errors, 0);
}

#[tokio::test]
async fn test_anomaly_batch_failure_is_non_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let log_file = write_logs(tmp.path(), 3);

    let engine = engine_with(MockProvider::rate_limited());
    let index = DocIndex::builtin();

    let (results, stats) = anomaly::detect_anomalies(&engine, &index, &log_file).await;

    assert!(results.is_empty());
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.total_logs, 3);
}

#[tokio::test]
async fn test_anomaly_batches_at_most_ten_records() {
    let tmp = tempfile::tempdir().unwrap();
    let log_file = write_logs(tmp.path(), 25);

    let mock = MockProvider::with(|prompt| {
        assert!(prompt.contains("Analyze the 10 Oracle audit logs"));
        Ok("[]".into())
    });
    let engine = engine_with(mock);
    let index = DocIndex::builtin();

    let (results, stats) = anomaly::detect_anomalies(&engine, &index, &log_file).await;

    assert!(results.is_empty());
    assert_eq!(stats.total_logs, 25);
    assert_eq!(stats.errors, 0);
}

#[tokio::test]
async fn test_anomaly_missing_log_file() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine_with(MockProvider::replying("[]"));
    let index = DocIndex::builtin();

    let (results, stats) =
        anomaly::detect_anomalies(&engine, &index, &tmp.path().join("absent.json")).await;

    assert!(results.is_empty());
    assert_eq!(stats.total_logs, 0);
}
