//! idemcache-domain: Core caching domain logic
//!
//! This crate contains the pure core of the service:
//! - Payload model and content-derived identifiers
//! - Deterministic content hashing
//! - The interleave transformer guarded by the cache
//! - Process-local fast-path registry
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              idemcache-domain               │
//! ├─────────────────────────────────────────────┤
//! │  payload.rs   - Payload & PayloadId types   │
//! │  identity.rs  - Canonical content hashing   │
//! │  transform.rs - Interleave transformer      │
//! │  registry.rs  - Fast-path registry          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate performs I/O; orchestration against the durable
//! store lives in `idemcache-server`.

pub mod error;
pub mod identity;
pub mod payload;
pub mod registry;
pub mod transform;

#[cfg(test)]
mod identity_proptest;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult};
pub use payload::{Payload, PayloadId};
pub use registry::{PayloadRegistry, RegistryConfig};
pub use transform::{InterleaveTransformer, Transform, TransformLimits};
