//! idemcache-api: HTTP API layer
//!
//! This crate provides the HTTP surface of the cache service:
//! - REST endpoints via Axum
//! - Middleware (request logging, request IDs)
//! - Structured logging bootstrap
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               idemcache-api                 │
//! ├─────────────────────────────────────────────┤
//! │  http/          - REST endpoints            │
//! │  middleware/    - Logging, request IDs      │
//! │  observability/ - tracing-subscriber setup  │
//! └─────────────────────────────────────────────┘
//! ```

pub mod http;
pub mod middleware;
pub mod observability;
