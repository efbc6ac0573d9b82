//! Middleware tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use tower::ServiceExt;

use super::*;

/// Helper to create a test app with all middleware layers.
///
/// Layers are applied bottom-to-top: the last `.layer()` call is the
/// outermost middleware, so the request ID exists before logging runs.
fn test_app_with_middleware() -> Router {
    Router::new()
        .route("/", get(|| async { "OK" }))
        .layer(RequestLoggingLayer::new())
        .layer(RequestIdLayer::new())
}

#[tokio::test]
async fn request_id_is_generated_when_absent() {
    let app = test_app_with_middleware();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .expect("response should carry a request id");
    assert!(!header.to_str().unwrap().is_empty());
}

#[tokio::test]
async fn incoming_request_id_is_propagated() {
    let app = test_app_with_middleware();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(REQUEST_ID_HEADER, "client-supplied-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "client-supplied-id"
    );
}

#[tokio::test]
async fn cors_preflight_gets_allow_headers() {
    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .layer(cors_layer());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/")
                .header("Origin", "http://example.com")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn logging_layer_passes_requests_through() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let app = test_app_with_middleware();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
