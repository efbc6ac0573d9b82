//! Process-local fast-path registry.
//!
//! Two concurrency-safe structures avoid redundant durable-store round
//! trips: a set of identifiers this process has confirmed cached
//! (write-path dedup) and an identifier -> output map (read-path
//! memoization). Both are populated only on confirmation -- a failed store
//! write never marks an identifier as known, so a retry re-attempts the
//! write.
//!
//! # Thread Safety
//!
//! Backed by DashMap/DashSet; the registry can be shared across async
//! tasks without external synchronization. Lookups and inserts are the
//! only critical sections -- callers must keep transformer calls and store
//! I/O outside of them, which the controller does by construction.

use dashmap::{DashMap, DashSet};

/// Configuration for the fast-path registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum number of memoized outputs.
    ///
    /// Once the memo map reaches this size the registry stops accepting new
    /// outputs and reads fall through to the durable store. Known-id
    /// tracking is not bounded: identifiers are small and forgetting one
    /// would reintroduce a recompute attempt.
    pub max_entries: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_entries: 100_000,
        }
    }
}

impl RegistryConfig {
    /// Sets the memoized-output cap.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }
}

/// Process-local registry of cached payload identifiers and outputs.
#[derive(Debug, Default)]
pub struct PayloadRegistry {
    known: DashSet<String>,
    outputs: DashMap<String, String>,
    config: RegistryConfig,
}

impl PayloadRegistry {
    /// Creates a new registry with the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            known: DashSet::new(),
            outputs: DashMap::new(),
            config,
        }
    }

    /// Returns whether the identifier is confirmed cached.
    pub fn is_known(&self, payload_id: &str) -> bool {
        self.known.contains(payload_id)
    }

    /// Records an identifier as confirmed cached.
    pub fn mark_known(&self, payload_id: &str) {
        self.known.insert(payload_id.to_string());
    }

    /// Returns the memoized output for an identifier, if present.
    pub fn cached_output(&self, payload_id: &str) -> Option<String> {
        self.outputs.get(payload_id).map(|o| o.value().clone())
    }

    /// Memoizes an output and marks the identifier known.
    ///
    /// Skipped once the memo map is at capacity; subsequent reads for the
    /// identifier keep falling through to the durable store. The cap is
    /// advisory: the size check and the insert are separate map operations,
    /// so concurrent callers may overshoot it by a few entries.
    pub fn remember_output(&self, payload_id: &str, output: &str) {
        self.mark_known(payload_id);
        if self.outputs.len() < self.config.max_entries || self.outputs.contains_key(payload_id) {
            self.outputs
                .insert(payload_id.to_string(), output.to_string());
        }
    }

    /// Number of confirmed-cached identifiers.
    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    /// Number of memoized outputs.
    pub fn output_len(&self) -> usize {
        self.outputs.len()
    }
}
