//! In-memory storage implementation.
//!
//! Backed by a DashMap for thread-safe concurrent access without a global
//! lock. The first-writer-wins `put` uses the map's atomic entry API so a
//! concurrent duplicate write can never corrupt an existing entry.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{StorageError, StorageResult};
use crate::traits::{CacheEntry, CacheStore};

/// In-memory implementation of CacheStore.
///
/// # Performance Characteristics
///
/// - **exists / get / put**: O(1) average (DashMap lookup)
///
/// Suitable for tests and single-process deployments; contents do not
/// survive a restart.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCacheStore {
    /// Creates a new in-memory cache store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory cache store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn exists(&self, payload_id: &str) -> StorageResult<bool> {
        Ok(self.entries.contains_key(payload_id))
    }

    async fn get(&self, payload_id: &str) -> StorageResult<CacheEntry> {
        self.entries
            .get(payload_id)
            .map(|e| e.value().clone())
            .ok_or_else(|| StorageError::EntryNotFound {
                payload_id: payload_id.to_string(),
            })
    }

    async fn put(&self, entry: CacheEntry) -> StorageResult<()> {
        // Atomic entry API closes the check-then-insert race window.
        use dashmap::mapref::entry::Entry;
        match self.entries.entry(entry.payload_id.clone()) {
            Entry::Occupied(_) => Err(StorageError::DuplicateEntry {
                payload_id: entry.payload_id,
            }),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }
}
