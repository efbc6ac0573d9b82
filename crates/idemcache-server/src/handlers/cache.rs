//! Cache controller: the create/read orchestrator.
//!
//! Per identifier the controller observes the lifecycle
//! `Unknown -> Computing -> Cached`, with no backward transition. The
//! create path is deliberately optimistic: there is no per-key lock, and
//! concurrent creates for the same identifier converge through the store's
//! first-writer-wins conflict detection. Content-addressed keys make real
//! contention rare, so racing and reconciling beats serializing.
//!
//! Registry lookups and inserts are the only critical sections; the
//! transformer call and all store I/O happen outside them.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use idemcache_domain::error::DomainError;
use idemcache_domain::payload::{Payload, PayloadId};
use idemcache_domain::registry::PayloadRegistry;
use idemcache_domain::transform::Transform;
use idemcache_storage::{CacheEntry, CacheStore, StorageError};

/// Errors surfaced by the cache controller.
///
/// `StorageError::DuplicateEntry` never appears here: a lost write race is
/// absorbed inside [`CacheController::create`] and is indistinguishable
/// from a cache hit to callers.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Client-caused validation failure; never retried.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// Durable-layer failure. The whole operation is idempotent, so the
    /// caller may safely retry from the outside.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for controller operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Orchestrates the create/read protocol over the fast-path registry and
/// the durable store, owning the at-most-once computation guarantee.
pub struct CacheController<S, T> {
    store: Arc<S>,
    registry: Arc<PayloadRegistry>,
    transformer: T,
}

impl<S: CacheStore, T: Transform> CacheController<S, T> {
    /// Creates a controller over the given store, registry and transformer.
    pub fn new(store: Arc<S>, registry: Arc<PayloadRegistry>, transformer: T) -> Self {
        Self {
            store,
            registry,
            transformer,
        }
    }

    /// The fast-path registry backing this controller.
    pub fn registry(&self) -> &PayloadRegistry {
        &self.registry
    }

    /// Idempotent create: returns the content-derived identifier, computing
    /// and persisting the transformation only on first sight.
    ///
    /// Lookup order: fast-path registry, then durable store, then compute.
    /// The durable check covers cold starts and identifiers written by
    /// other processes; the registry is only ever warmed from confirmed
    /// durable state.
    pub async fn create(&self, payload: &Payload) -> CacheResult<PayloadId> {
        let id = PayloadId::from_payload(payload);

        if self.registry.is_known(id.as_str()) {
            debug!(payload_id = %id, "create: fast-path hit");
            return Ok(id);
        }

        if self.store.exists(id.as_str()).await? {
            debug!(payload_id = %id, "create: durable hit, warming registry");
            self.registry.mark_known(id.as_str());
            return Ok(id);
        }

        // Miss on both tiers: compute. Validation errors propagate without
        // touching the store or the registry.
        let output = self.transformer.transform(payload)?;
        let input =
            serde_json::to_string(payload).map_err(|e| StorageError::SerializationError {
                message: e.to_string(),
            })?;

        match self.store.put(CacheEntry::new(id.as_str(), input, output)).await {
            Ok(()) => {
                info!(payload_id = %id, "create: computed and cached");
                self.registry.mark_known(id.as_str());
                Ok(id)
            }
            Err(StorageError::DuplicateEntry { .. }) => {
                // Another writer persisted the same content first. The
                // losing computation is discarded, not an error.
                debug!(payload_id = %id, "create: lost write race, treating as hit");
                self.registry.mark_known(id.as_str());
                Ok(id)
            }
            Err(e) => {
                warn!(payload_id = %id, operation = "put", error = %e, "create: store write failed");
                // Registry stays untouched so a retry re-attempts the write.
                Err(e.into())
            }
        }
    }

    /// Read-through lookup of a stored output by identifier.
    pub async fn read(&self, id: &PayloadId) -> CacheResult<String> {
        if let Some(output) = self.registry.cached_output(id.as_str()) {
            debug!(payload_id = %id, "read: fast-path hit");
            return Ok(output);
        }

        let entry = self.store.get(id.as_str()).await.map_err(|e| {
            if !matches!(e, StorageError::EntryNotFound { .. }) {
                warn!(payload_id = %id, operation = "get", error = %e, "read: store lookup failed");
            }
            e
        })?;

        debug!(payload_id = %id, "read: durable hit, memoizing");
        self.registry.remember_output(id.as_str(), &entry.output_payload);
        Ok(entry.output_payload)
    }
}
