//! Application state for HTTP handlers.

use std::sync::Arc;

use idemcache_domain::registry::{PayloadRegistry, RegistryConfig};
use idemcache_domain::transform::{InterleaveTransformer, TransformLimits};
use idemcache_server::handlers::cache::CacheController;
use idemcache_storage::CacheStore;

/// Application state shared across all HTTP handlers.
///
/// Holds the storage backend, the fast-path registry and the controller
/// wiring them together. The registry is injectable so tests can assert on
/// its contents directly.
///
/// # Type Parameters
///
/// * `S` - The storage backend implementing `CacheStore`
pub struct AppState<S: CacheStore> {
    /// The storage backend.
    pub storage: Arc<S>,
    /// The create/read orchestrator.
    pub controller: Arc<CacheController<S, InterleaveTransformer>>,
    /// The process-local fast-path registry.
    pub registry: Arc<PayloadRegistry>,
}

impl<S: CacheStore> AppState<S> {
    /// Creates application state with default limits and registry config.
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_config(
            storage,
            TransformLimits::default(),
            RegistryConfig::default(),
        )
    }

    /// Creates application state with explicit transformer limits and
    /// registry configuration.
    pub fn with_config(
        storage: Arc<S>,
        limits: TransformLimits,
        registry_config: RegistryConfig,
    ) -> Self {
        let registry = Arc::new(PayloadRegistry::new(registry_config));
        let controller = Arc::new(CacheController::new(
            Arc::clone(&storage),
            Arc::clone(&registry),
            InterleaveTransformer::new(limits),
        ));

        Self {
            storage,
            controller,
            registry,
        }
    }
}

impl<S: CacheStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            controller: Arc::clone(&self.controller),
            registry: Arc::clone(&self.registry),
        }
    }
}
