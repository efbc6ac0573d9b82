//! HTTP route definitions and handlers.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::error;

use idemcache_domain::error::DomainError;
use idemcache_domain::payload::{Payload, PayloadId};
use idemcache_server::handlers::cache::CacheError;
use idemcache_storage::{CacheStore, StorageError};

use super::state::AppState;
use crate::middleware::{cors_layer, RequestIdLayer, RequestLoggingLayer};

/// Custom JSON extractor that returns 400 Bad Request instead of 422
/// Unprocessable Entity for deserialization errors.
///
/// Preserves 413 Payload Too Large for body limit errors.
pub struct JsonBadRequest<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBadRequest<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiError>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBadRequest(value)),
            Err(rejection) => {
                use axum::extract::rejection::JsonRejection;

                let status = match &rejection {
                    JsonRejection::BytesRejection(_) => {
                        // BytesRejection wraps body limit errors.
                        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                            StatusCode::PAYLOAD_TOO_LARGE
                        } else {
                            StatusCode::BAD_REQUEST
                        }
                    }
                    _ => StatusCode::BAD_REQUEST,
                };

                let message = rejection.body_text();
                let error = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::payload_too_large(message)
                } else {
                    ApiError::validation_error(message)
                };

                Err((status, Json(error)))
            }
        }
    }
}

/// Default request body size limit (1MB).
/// This prevents memory exhaustion from oversized payloads.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Creates the HTTP router with all cache endpoints.
///
/// Applies the default body size limit (1MB).
pub fn create_router<S: CacheStore>(state: AppState<S>) -> Router {
    create_router_with_body_limit(state, DEFAULT_BODY_LIMIT)
}

/// Creates the HTTP router with a custom body size limit.
///
/// # Arguments
///
/// * `state` - Application state with storage backend
/// * `body_limit` - Maximum request body size in bytes
pub fn create_router_with_body_limit<S: CacheStore>(
    state: AppState<S>,
    body_limit: usize,
) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/payload", post(create_payload::<S>))
        .route("/payload/:payload_id", get(read_payload::<S>))
        .route("/ready", get(readiness_check::<S>))
        .route("/health", get(health_check))
        .with_state(shared_state)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(RequestLoggingLayer::new())
        .layer(RequestIdLayer::new())
        // Outermost so preflight requests are answered before routing.
        .layer(cors_layer())
}

// ============================================================
// Error Handling
// ============================================================

/// Machine-readable error codes returned to clients.
///
/// Each code maps to a specific HTTP status via [`ApiError::into_response`].
pub mod error_codes {
    /// Generic input validation error (bad shape, size limits, malformed
    /// identifier).
    pub const VALIDATION_ERROR: &str = "validation_error";
    /// No cache entry exists for the requested identifier.
    pub const PAYLOAD_NOT_FOUND: &str = "payload_not_found";
    /// Request body exceeds the maximum allowed size.
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
    /// Unexpected internal server error.
    pub const INTERNAL_ERROR: &str = "internal_error";
    /// Storage backend temporarily unavailable.
    pub const SERVICE_UNAVAILABLE: &str = "service_unavailable";
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error (400).
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::VALIDATION_ERROR, message)
    }

    /// Creates a payload not found error (404).
    pub fn payload_not_found(message: impl Into<String>) -> Self {
        Self::new(error_codes::PAYLOAD_NOT_FOUND, message)
    }

    /// Creates a payload too large error (413).
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(error_codes::PAYLOAD_TOO_LARGE, message)
    }

    /// Creates an internal error (500).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message)
    }

    /// Creates a service unavailable error (503).
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(error_codes::SERVICE_UNAVAILABLE, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use error_codes::*;

        let status = match self.code.as_str() {
            VALIDATION_ERROR => StatusCode::BAD_REQUEST,
            PAYLOAD_NOT_FOUND => StatusCode::NOT_FOUND,
            PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            SERVICE_UNAVAILABLE => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        // All domain errors are client-caused validation failures; the
        // messages carry no internal detail and are safe to surface.
        ApiError::validation_error(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::EntryNotFound { payload_id } => ApiError::payload_not_found(format!(
                "payload id {payload_id} not found in cache"
            )),
            StorageError::ConnectionError { .. } => {
                error!(error = %err, "storage unavailable");
                ApiError::service_unavailable("storage backend unavailable")
            }
            // DuplicateEntry never reaches this layer; the controller
            // absorbs it during create.
            _ => {
                error!(error = %err, "storage error");
                ApiError::internal_error("internal storage error")
            }
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Validation(e) => e.into(),
            CacheError::Storage(e) => e.into(),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================
// Health and Readiness Checks
// ============================================================

/// Identifier used by the readiness probe; any well-formed id works since
/// only store connectivity matters.
const READINESS_PROBE_ID: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Basic health check - returns 200 if the server is running.
///
/// Liveness probe; does NOT check dependencies.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Readiness check - validates that the durable store is reachable.
///
/// Returns 200 if ready, 503 if the storage backend is unavailable. Error
/// details are logged but not exposed in the response.
async fn readiness_check<S: CacheStore>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    match state.storage.exists(READINESS_PROBE_ID).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ready",
                "checks": { "storage": "ok" }
            })),
        ),
        Err(e) => {
            error!("readiness check failed: storage unavailable: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "not_ready",
                    "checks": { "storage": "unavailable" }
                })),
            )
        }
    }
}

// ============================================================
// Cache Endpoints
// ============================================================

/// Request body for creating a cache payload.
#[derive(Debug, Deserialize)]
pub struct CreatePayloadRequest {
    pub items_a: Vec<String>,
    pub items_b: Vec<String>,
}

/// Response after creating (or reusing) a cache payload.
#[derive(Debug, Serialize)]
pub struct CreatePayloadResponse {
    pub payload_id: String,
}

/// Response when retrieving a cache payload.
#[derive(Debug, Serialize)]
pub struct ReadPayloadResponse {
    pub output: String,
}

/// Create a cache payload (POST /payload).
///
/// Returns 201 with the content-derived identifier whether the payload was
/// newly computed or already cached; clients cannot tell the two apart.
async fn create_payload<S: CacheStore>(
    State(state): State<Arc<AppState<S>>>,
    JsonBadRequest(body): JsonBadRequest<CreatePayloadRequest>,
) -> ApiResult<impl IntoResponse> {
    // Redundant shape check; the transformer re-validates everything.
    if body.items_a.len() != body.items_b.len() {
        return Err(ApiError::validation_error(
            "items_a and items_b must be of the same length",
        ));
    }

    let payload = Payload::new(body.items_a, body.items_b);
    let payload_id = state.controller.create(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePayloadResponse {
            payload_id: payload_id.to_string(),
        }),
    ))
}

/// Retrieve a cached output (GET /payload/{payload_id}).
async fn read_payload<S: CacheStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(payload_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    // Reject malformed identifiers before any store round trip.
    let id = PayloadId::parse(&payload_id)?;
    let output = state.controller.read(&id).await?;

    Ok(Json(ReadPayloadResponse { output }))
}
