//! Storage error types.

use thiserror::Error;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No entry exists for the identifier.
    #[error("cache entry not found: {payload_id}")]
    EntryNotFound { payload_id: String },

    /// An entry for the identifier already exists.
    ///
    /// The stored data is left untouched; entries are write-once and a
    /// duplicate `put` never overwrites. Callers racing on the same
    /// identifier treat this as benign.
    #[error("cache entry already exists: {payload_id}")]
    DuplicateEntry { payload_id: String },

    /// Database connection error.
    #[error("database connection error: {message}")]
    ConnectionError { message: String },

    /// Database query error.
    #[error("database query error: {message}")]
    QueryError { message: String },

    /// Serialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },

    /// Internal error.
    #[error("internal storage error: {message}")]
    InternalError { message: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
