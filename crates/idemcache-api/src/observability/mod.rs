//! Observability infrastructure.
//!
//! Currently structured logging configuration; operational events (cache
//! hits/misses, store failures) are emitted through `tracing` and never
//! sit on the correctness path.

mod logging;

pub use logging::{init_logging, LoggingConfig};
