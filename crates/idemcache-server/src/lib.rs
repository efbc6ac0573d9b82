//! idemcache-server: Configuration and orchestration
//!
//! This crate contains:
//! - Server configuration loading (defaults, YAML file, env overrides)
//! - The cache controller implementing the create/read protocol over the
//!   fast-path registry and the durable store

pub mod config;
pub mod handlers;

pub use config::ServerConfig;
pub use handlers::cache::{CacheController, CacheError, CacheResult};
