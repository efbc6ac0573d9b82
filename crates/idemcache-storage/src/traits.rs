//! CacheStore trait definition.

use async_trait::async_trait;

use crate::error::StorageResult;

/// A persisted (input, output) pair keyed by payload identifier.
///
/// Entries are write-once: created by the first successful `put` for an
/// identifier and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Content-derived identifier; primary key.
    pub payload_id: String,
    /// The original payload, serialized as JSON.
    pub input_payload: String,
    /// The computed transformer output.
    pub output_payload: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(
        payload_id: impl Into<String>,
        input_payload: impl Into<String>,
        output_payload: impl Into<String>,
    ) -> Self {
        Self {
            payload_id: payload_id.into(),
            input_payload: input_payload.into(),
            output_payload: output_payload.into(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Abstract key-value persistence for cache entries.
///
/// Implementations must be thread-safe (Send + Sync) and tolerate
/// concurrent `put` calls: writes for different identifiers proceed
/// independently, and a duplicate write for the same identifier returns
/// [`StorageError::DuplicateEntry`] while leaving the stored entry
/// untouched. That conflict signal is what resolves concurrent compute
/// races further up the stack.
///
/// [`StorageError::DuplicateEntry`]: crate::error::StorageError::DuplicateEntry
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Returns whether an entry exists for the identifier.
    async fn exists(&self, payload_id: &str) -> StorageResult<bool>;

    /// Fetches the entry for the identifier.
    async fn get(&self, payload_id: &str) -> StorageResult<CacheEntry>;

    /// Persists a new entry. First writer wins.
    async fn put(&self, entry: CacheEntry) -> StorageResult<()>;
}
