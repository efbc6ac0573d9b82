//! HTTP REST API endpoints.
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/payload` | POST | Create (or reuse) a cached payload, returns its identifier |
//! | `/payload/{payload_id}` | GET | Retrieve the cached output by identifier |
//! | `/health` | GET | Liveness probe |
//! | `/ready` | GET | Readiness probe (checks the durable store) |

pub mod routes;
pub mod state;

pub use routes::{create_router, create_router_with_body_limit, ApiError, DEFAULT_BODY_LIMIT};
pub use state::AppState;

#[cfg(test)]
mod tests;
