//! HTTP API tests for the cache endpoints.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt; // for oneshot

use idemcache_storage::{CacheEntry, CacheStore, MemoryCacheStore};

use super::routes::{create_router, create_router_with_body_limit};
use super::state::AppState;

/// Helper to create a test app with in-memory storage.
fn test_app() -> axum::Router {
    let storage = Arc::new(MemoryCacheStore::new());
    let state = AppState::new(storage);
    create_router(state)
}

/// Helper to POST a JSON body to /payload and return the raw response.
async fn post_payload(app: axum::Router, body: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/payload")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Helper to GET /payload/{id} and return the raw response.
async fn get_payload(app: axum::Router, payload_id: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .uri(format!("/payload/{payload_id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Test: Server responds to health checks
#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

/// Test: Readiness probe returns 200 when the store is reachable
#[tokio::test]
async fn test_readiness_check_with_healthy_store() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["checks"]["storage"], "ok");
}

/// Test: POST /payload returns 201 with a 64-char hex identifier
#[tokio::test]
async fn test_create_payload_returns_201_with_identifier() {
    let app = test_app();

    let response = post_payload(
        app,
        r#"{ "items_a": ["hello"], "items_b": ["world"] }"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response).await;
    let payload_id = json["payload_id"].as_str().unwrap();
    assert_eq!(payload_id.len(), 64);
    assert!(payload_id.chars().all(|c| c.is_ascii_hexdigit()));
}

/// Test: Repeating a create returns the same identifier and 201 both times
#[tokio::test]
async fn test_create_payload_is_idempotent() {
    let storage = Arc::new(MemoryCacheStore::new());
    let state = AppState::new(Arc::clone(&storage));
    let app = create_router(state);

    let body = r#"{ "items_a": ["one", "two"], "items_b": ["three", "four"] }"#;

    let first = post_payload(app.clone(), body).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first_id = json_body(first).await["payload_id"].as_str().unwrap().to_string();

    let second = post_payload(app, body).await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second_id = json_body(second).await["payload_id"].as_str().unwrap().to_string();

    assert_eq!(first_id, second_id);
    assert_eq!(storage.len(), 1);
}

/// Test: Read after create returns the transformed output
#[tokio::test]
async fn test_read_after_create_returns_output() {
    let app = test_app();

    let response = post_payload(
        app.clone(),
        r#"{ "items_a": ["hello"], "items_b": ["world"] }"#,
    )
    .await;
    let payload_id = json_body(response).await["payload_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = get_payload(app, &payload_id).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["output"], "HELLO, WORLD");
}

/// Test: Normalization folds whitespace and the output is uppercased
#[tokio::test]
async fn test_create_normalizes_and_uppercases() {
    let app = test_app();

    let response = post_payload(
        app.clone(),
        r#"{ "items_a": ["  mixed   Case  "], "items_b": ["b"] }"#,
    )
    .await;
    let payload_id = json_body(response).await["payload_id"]
        .as_str()
        .unwrap()
        .to_string();

    let json = json_body(get_payload(app, &payload_id).await).await;
    assert_eq!(json["output"], "MIXED CASE, B");
}

/// Test: Unknown well-formed identifier returns 404 with payload_not_found
#[tokio::test]
async fn test_read_unknown_id_returns_404() {
    let app = test_app();

    let unknown = "a".repeat(64);
    let response = get_payload(app, &unknown).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["code"], "payload_not_found");
}

/// Test: Malformed identifier is rejected with 400 before any store lookup
#[tokio::test]
async fn test_read_malformed_id_returns_400() {
    let app = test_app();

    let uppercase_hex = "A".repeat(64);
    let non_hex = "g".repeat(64);
    for bad_id in ["not-hex", "abc123", uppercase_hex.as_str(), non_hex.as_str()] {
        let response = get_payload(app.clone(), bad_id).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected 400 for identifier {bad_id:?}"
        );

        let json = json_body(response).await;
        assert_eq!(json["code"], "validation_error");
    }
}

/// Test: Mismatched list lengths return 400 and write nothing
#[tokio::test]
async fn test_create_length_mismatch_returns_400() {
    let storage = Arc::new(MemoryCacheStore::new());
    let state = AppState::new(Arc::clone(&storage));
    let app = create_router(state);

    let response = post_payload(
        app,
        r#"{ "items_a": ["a", "b"], "items_b": ["c"] }"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "validation_error");
    assert!(storage.is_empty());
}

/// Test: Malformed JSON body returns 400, not 422
#[tokio::test]
async fn test_create_malformed_json_returns_400() {
    let app = test_app();

    let response = post_payload(app.clone(), "{ not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing fields are also a 400.
    let response = post_payload(app, r#"{ "items_a": ["a"] }"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Test: Empty lists are valid and produce an empty output
#[tokio::test]
async fn test_create_empty_lists() {
    let app = test_app();

    let response = post_payload(app.clone(), r#"{ "items_a": [], "items_b": [] }"#).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let payload_id = json_body(response).await["payload_id"]
        .as_str()
        .unwrap()
        .to_string();

    let json = json_body(get_payload(app, &payload_id).await).await;
    assert_eq!(json["output"], "");
}

/// Test: Oversized request body returns 413
#[tokio::test]
async fn test_create_oversized_body_returns_413() {
    let storage = Arc::new(MemoryCacheStore::new());
    let state = AppState::new(storage);
    let app = create_router_with_body_limit(state, 256);

    let big_item = "x".repeat(512);
    let body = format!(r#"{{ "items_a": ["{big_item}"], "items_b": ["y"] }}"#);

    let response = post_payload(app, &body).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

/// Test: The router answers CORS preflight and marks responses for
/// cross-origin callers
#[tokio::test]
async fn test_router_applies_cors() {
    let app = test_app();

    let preflight = app
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/payload")
                .header("Origin", "http://example.com")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(preflight.status(), StatusCode::OK);
    assert!(preflight
        .headers()
        .contains_key("access-control-allow-origin"));

    // Actual cross-origin requests carry the allow header too.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/payload")
                .header("Origin", "http://example.com")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{ "items_a": ["hello"], "items_b": ["world"] }"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

/// Test: Pre-seeded durable entries are served without re-computation
#[tokio::test]
async fn test_read_serves_pre_seeded_entry() {
    let storage = Arc::new(MemoryCacheStore::new());

    let payload_id = "b".repeat(64);
    storage
        .put(CacheEntry::new(
            payload_id.clone(),
            r#"{"items_a":["x"],"items_b":["y"]}"#.to_string(),
            "X, Y".to_string(),
        ))
        .await
        .unwrap();

    let state = AppState::new(storage);
    let app = create_router(state);

    let response = get_payload(app, &payload_id).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["output"], "X, Y");
}
