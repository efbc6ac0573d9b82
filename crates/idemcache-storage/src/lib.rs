//! idemcache-storage: Durable store abstraction
//!
//! This crate provides the storage layer for idemcache, including:
//! - CacheStore trait for write-once entry persistence
//! - In-memory implementation for testing and single-node use
//! - PostgreSQL implementation for production
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              idemcache-storage              │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs   - CacheStore trait definition  │
//! │  memory.rs   - In-memory implementation     │
//! │  postgres.rs - PostgreSQL implementation    │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod postgres;
pub mod traits;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryCacheStore;
pub use postgres::{PostgresCacheStore, PostgresConfig};
pub use traits::{CacheEntry, CacheStore};
