//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use doc_cache::{api::create_router, AppState, Cache, CacheRecord, DocumentStore, MemoryStore};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cache = Cache::new(store.clone(), 300.0).unwrap();
    (create_router(AppState::new(cache)), store)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == SET / GET ==

#[tokio::test]
async fn test_set_then_get_roundtrip() {
    let (app, _store) = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/set",
        Some(json!({"key": "host1", "value": {"os": "linux", "ips": ["10.0.0.1"]}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("host1"));

    let (status, json) = send(&app, "GET", "/get/host1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "host1");
    assert_eq!(json["value"], json!({"os": "linux", "ips": ["10.0.0.1"]}));
}

#[tokio::test]
async fn test_set_overwrites() {
    let (app, store) = create_test_app();

    send(&app, "PUT", "/set", Some(json!({"key": "a", "value": {"x": 1}}))).await;
    send(&app, "PUT", "/set", Some(json!({"key": "a", "value": {"x": 2}}))).await;

    let (_, json) = send(&app, "GET", "/get/a", None).await;
    assert_eq!(json["value"], json!({"x": 2}));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_set_empty_key_rejected() {
    let (app, _store) = create_test_app();

    let (status, json) = send(&app, "PUT", "/set", Some(json!({"key": "", "value": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_get_missing_key() {
    let (app, _store) = create_test_app();

    let (status, json) = send(&app, "GET", "/get/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_get_corrupt_record() {
    let (app, store) = create_test_app();
    store
        .upsert(CacheRecord::new("broken", "{not json"))
        .await
        .unwrap();

    let (status, json) = send(&app, "GET", "/get/broken", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("removed"));

    let (status, json) = send(&app, "GET", "/contains/broken", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["exists"], false);
}

// == DELETE ==

#[tokio::test]
async fn test_delete_endpoint() {
    let (app, _store) = create_test_app();
    send(&app, "PUT", "/set", Some(json!({"key": "gone", "value": true}))).await;

    let (status, _) = send(&app, "DELETE", "/del/gone", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/get/gone", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/del/gone", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_store_only_key() {
    let (app, store) = create_test_app();
    store.upsert(CacheRecord::new("foreign", "1")).await.unwrap();

    let (status, _) = send(&app, "DELETE", "/del/foreign", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.is_empty().await);
}

// == KEYS / COPY / FLUSH ==

#[tokio::test]
async fn test_keys_copy_flush() {
    let (app, store) = create_test_app();
    send(&app, "PUT", "/set", Some(json!({"key": "b", "value": 2}))).await;
    send(&app, "PUT", "/set", Some(json!({"key": "a", "value": 1}))).await;
    store.upsert(CacheRecord::new("c", "3")).await.unwrap();

    let (status, json) = send(&app, "GET", "/keys", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["keys"], json!(["a", "b", "c"]));
    assert_eq!(json["count"], 3);

    let (status, json) = send(&app, "GET", "/copy", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"a": 1, "b": 2, "c": 3}));

    let (status, json) = send(&app, "POST", "/flush", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 3);
    assert!(store.is_empty().await);

    let (_, json) = send(&app, "GET", "/keys", None).await;
    assert_eq!(json["count"], 0);
}

// == STATS / HEALTH ==

#[tokio::test]
async fn test_stats_track_memo_and_store_hits() {
    let (app, store) = create_test_app();
    send(&app, "PUT", "/set", Some(json!({"key": "memo", "value": 1}))).await;
    store.upsert(CacheRecord::new("stored", "2")).await.unwrap();

    send(&app, "GET", "/get/memo", None).await;
    send(&app, "GET", "/get/stored", None).await;
    send(&app, "GET", "/get/nothing", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["memo_hits"], 1);
    assert_eq!(json["store_hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["memo_entries"], 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _store) = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}
