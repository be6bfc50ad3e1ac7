//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use simple_cache::{create_router, AppState, Config, Engine, EngineConfig, StatsObserver};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::from_config(&Config::default()))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn set(app: &Router, key: &str, value: &str, expire: &str) {
    let (status, _) = send(
        app,
        "PUT",
        "/set",
        Some(json!({"key": key, "value": value, "expire": expire})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn search(app: &Router, pattern: &str, mode: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/search",
        Some(json!({"pattern": pattern, "mode": mode})),
    )
    .await
}

fn sorted_keys(json: &Value) -> Vec<String> {
    let mut keys: Vec<String> = json["keys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|key| key.as_str().unwrap().to_string())
        .collect();
    keys.sort();
    keys
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/set",
        Some(json!({"key": "test_key", "value": "test_value"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": true, "key": "test_key"}));
}

#[tokio::test]
async fn test_set_endpoint_with_expire() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/set",
        Some(json!({"key": "ttl_key", "value": "v", "expire": "1h30m"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, "GET", "/get/ttl_key", None).await;
    assert_eq!(json["found"], true);
}

#[tokio::test]
async fn test_set_endpoint_invalid_ttl() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/set",
        Some(json!({"key": "k", "value": "v", "expire": "10 minutes"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid TTL"));

    let (_, json) = send(&app, "GET", "/get/k", None).await;
    assert_eq!(json["found"], false);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();
    set(&app, "get_test", "get_value", "").await;

    let (status, json) = send(&app, "GET", "/get/get_test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"key": "get_test", "value": "get_value", "found": true})
    );
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/get/nonexistent", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"key": "nonexistent", "value": "", "found": false})
    );
}

#[tokio::test]
async fn test_overwrite_replaces_value() {
    let app = create_test_app();
    set(&app, "k", "first", "").await;
    set(&app, "k", "second", "").await;

    let (_, json) = send(&app, "GET", "/get/k", None).await;
    assert_eq!(json["value"], "second");
}

// == DELETE / EXPIRE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint() {
    let app = create_test_app();
    set(&app, "delete_me", "v", "").await;

    let (status, json) = send(&app, "DELETE", "/del/delete_me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"key": "delete_me", "existed": true}));

    let (status, json) = send(&app, "DELETE", "/del/delete_me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["existed"], false);

    let (_, json) = search(&app, "*", "WILDCARD").await;
    assert!(sorted_keys(&json).is_empty());
}

#[tokio::test]
async fn test_expire_endpoint() {
    let app = create_test_app();
    set(&app, "session:1", "token", "1h").await;

    let (status, json) = send(&app, "POST", "/expire/session:1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"key": "session:1", "existed": true}));

    let (_, json) = send(&app, "GET", "/get/session:1", None).await;
    assert_eq!(json["found"], false);

    let (_, json) = send(&app, "POST", "/expire/session:1", None).await;
    assert_eq!(json["existed"], false);
}

// == SEARCH Endpoint Tests ==

#[tokio::test]
async fn test_search_prefix_and_glob() {
    let app = create_test_app();
    for key in ["user:1", "user:2", "user:10", "order:1", "temp"] {
        set(&app, key, "v", "").await;
    }

    let (status, json) = search(&app, "user:*", "WILDCARD").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sorted_keys(&json), vec!["user:1", "user:10", "user:2"]);

    let (_, json) = search(&app, "*:1", "WILDCARD").await;
    assert_eq!(sorted_keys(&json), vec!["order:1", "user:1"]);

    let (_, json) = search(&app, "user:?", "WILDCARD").await;
    assert_eq!(sorted_keys(&json), vec!["user:1", "user:2"]);

    let (_, json) = search(&app, "*", "WILDCARD").await;
    assert_eq!(sorted_keys(&json).len(), 5);
}

#[tokio::test]
async fn test_search_regex_mode() {
    let app = create_test_app();
    for key in ["user:1", "user:22", "order:1"] {
        set(&app, key, "v", "").await;
    }

    let (_, json) = search(&app, "user:[0-9]+", "REGEX").await;
    assert_eq!(sorted_keys(&json), vec!["user:1", "user:22"]);

    // Regex must match the whole key
    let (_, json) = search(&app, "user", "REGEX").await;
    assert!(sorted_keys(&json).is_empty());
}

#[tokio::test]
async fn test_search_regex_prefix_forces_regex() {
    let app = create_test_app();
    for key in ["a1", "a2", "b1"] {
        set(&app, key, "v", "").await;
    }

    let (status, json) = search(&app, "regex:a[0-9]", "WILDCARD").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sorted_keys(&json), vec!["a1", "a2"]);
}

#[tokio::test]
async fn test_search_default_mode_is_wildcard() {
    let app = create_test_app();
    set(&app, "log.1", "v", "").await;
    set(&app, "logx1", "v", "").await;

    let (_, json) = send(&app, "POST", "/search", Some(json!({"pattern": "log.*"}))).await;
    assert_eq!(sorted_keys(&json), vec!["log.1"]);
}

#[tokio::test]
async fn test_search_invalid_patterns() {
    let app = create_test_app();

    let (status, json) = search(&app, "[abc", "WILDCARD").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid pattern"));

    let (status, _) = search(&app, "(unclosed", "REGEX").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_skips_expired_keys() {
    let app = create_test_app();
    set(&app, "live", "v", "").await;
    set(&app, "dead", "v", "-1s").await;

    let (_, json) = search(&app, "*", "WILDCARD").await;
    assert_eq!(sorted_keys(&json), vec!["live"]);
}

// == RESET Endpoint Tests ==

#[tokio::test]
async fn test_reset_endpoint() {
    let app = create_test_app();
    set(&app, "a", "1", "").await;
    set(&app, "b", "2", "1h").await;
    set(&app, "c", "3", "").await;

    let (status, json) = send(&app, "POST", "/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": true, "keys_cleared": 3}));

    let (_, json) = search(&app, "*", "WILDCARD").await;
    assert!(sorted_keys(&json).is_empty());

    let (_, json) = send(&app, "POST", "/reset", None).await;
    assert_eq!(json["keys_cleared"], 0);
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();
    set(&app, "stats_key", "value", "").await;
    send(&app, "GET", "/get/stats_key", None).await;
    send(&app, "GET", "/get/missing", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["item_count"], 1);
    assert_eq!(json["memory_bytes"], "stats_key".len() + "value".len());
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < 0.001);

    let get = json["operations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|op| op["operation"] == "get")
        .unwrap();
    assert_eq!(get["success"], 1);
    assert_eq!(get["failure"], 1);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"invalid json"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Axum rejects malformed JSON before the handler runs
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/set",
        Some(json!({"key": "", "value": "test"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Key cannot be empty"));
}

// == TTL Expiration via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();
    set(&app, "ttl_test", "expires_soon", "100ms").await;

    let (_, json) = send(&app, "GET", "/get/ttl_test", None).await;
    assert_eq!(json["found"], true);

    tokio::time::sleep(Duration::from_millis(150)).await;

    let (status, json) = send(&app, "GET", "/get/ttl_test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["found"], false);
}

#[tokio::test]
async fn test_evictor_removes_expired_keys_via_api() {
    let stats = Arc::new(StatsObserver::new());
    let engine = Engine::new(
        EngineConfig::default().with_cleanup_interval(Duration::from_millis(20)),
        stats.clone(),
    );
    let state = AppState::new(Arc::new(engine), stats);
    let app = create_router(state.clone());

    set(&app, "short", "v", "10ms").await;
    set(&app, "long", "v", "1h").await;

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(state.engine.len(), 1);
    let (_, json) = send(&app, "GET", "/stats", None).await;
    let evict = json["operations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|op| op["operation"] == "evict")
        .unwrap();
    assert!(evict["success"].as_u64().unwrap() >= 1);

    state.engine.shutdown().await;
}
