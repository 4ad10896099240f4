// tests/api_test.rs — HTTP surface over a mock engine

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::MockProvider;
use oramind::api::{build_router, ApiState};
use oramind::engine::{Engine, EngineRegistry};
use oramind::infra::config::EngineSettings;
use oramind::provider::ProviderKind;
use oramind::retrieval::DocIndex;
use tower::ServiceExt;

fn test_state(mock: Arc<MockProvider>, dir: &std::path::Path) -> ApiState {
    ApiState {
        registry: Arc::new(EngineRegistry::new(Engine::with_provider(
            ProviderKind::Groq,
            mock,
        ))),
        index: Arc::new(DocIndex::builtin()),
        settings: EngineSettings::default(),
        data_dir: dir.to_path_buf(),
        log_file: dir.join("synthetic_logs.json"),
    }
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(MockProvider::replying("x"), tmp.path()));

    let resp = app
        .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_chat_empty_query_gets_canned_nudge() {
    let tmp = tempfile::tempdir().unwrap();
    let mock = MockProvider::replying("should not be called");
    let app = build_router(test_state(mock.clone(), tmp.path()));

    let resp = app
        .oneshot(post_json("/api/v1/chat", serde_json::json!({ "query": "  " })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert!(body["response"].as_str().unwrap().contains("real question"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_chat_failure_is_apologetic_not_500() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(MockProvider::rate_limited(), tmp.path()));

    let resp = app
        .oneshot(post_json(
            "/api/v1/chat",
            serde_json::json!({ "query": "why is my query slow?" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert!(body["response"].as_str().unwrap().starts_with("Sorry"));
}

#[tokio::test]
async fn test_engine_swap_unknown_provider_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(MockProvider::replying("x"), tmp.path()));

    let resp = app
        .oneshot(post_json(
            "/api/v1/engine",
            serde_json::json!({ "provider": "mistral" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("mistral"));
}

#[tokio::test]
async fn test_engine_swap_installs_new_provider() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(MockProvider::replying("x"), tmp.path());
    let registry = state.registry.clone();
    let app = build_router(state);

    let resp = app
        .oneshot(post_json(
            "/api/v1/engine",
            serde_json::json!({ "provider": "ollama" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(registry.current().provider_kind(), ProviderKind::Ollama);
}

#[tokio::test]
async fn test_backup_endpoint_uses_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let mock = MockProvider::with(|prompt| {
        if prompt.contains("RMAN script") {
            Ok("RUN { BACKUP DATABASE; }".into())
        } else {
            assert!(prompt.contains("RPO:4h") && prompt.contains("RTO:2h"));
            Ok("strategy".into())
        }
    });
    let app = build_router(test_state(mock, tmp.path()));

    let resp = app
        .oneshot(post_json("/api/v1/backup/recommend", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["strategy"], "strategy");
    assert!(body["script"].as_str().unwrap().contains("BACKUP"));
}

#[tokio::test]
async fn test_optimize_endpoint_returns_advice() {
    let tmp = tempfile::tempdir().unwrap();
    let mock = MockProvider::with(|prompt| {
        if prompt.contains("Propose 3 concrete optimizations") {
            Ok("a\nb\nc\nd".into())
        } else {
            Ok("slow because of a full table scan".into())
        }
    });
    let app = build_router(test_state(mock, tmp.path()));

    let resp = app
        .oneshot(post_json(
            "/api/v1/performance/optimize",
            serde_json::json!({ "sql": "SELECT * FROM emp" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
    assert_eq!(body["before_cost"], "High");
}
