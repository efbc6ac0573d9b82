//! PostgreSQL storage implementation.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::instrument;

use crate::error::{StorageError, StorageResult};
use crate::traits::{CacheEntry, CacheStore};

/// Connection configuration for [`PostgresCacheStore`].
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum pool connections.
    pub max_connections: u32,
    /// Minimum pool connections kept warm.
    pub min_connections: u32,
    /// Connection acquire timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost:5432/idemcache".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
        }
    }
}

/// PostgreSQL implementation of CacheStore.
///
/// Entries live in the `cache_entries` table keyed by `payload_id`. The
/// write path relies on `ON CONFLICT DO NOTHING`, so a duplicate write is
/// a storage-level no-op reported as `DuplicateEntry` -- the existing row
/// is never touched, which is what makes restart-driven recomputes and
/// concurrent writers converge safely.
#[derive(Debug, Clone)]
pub struct PostgresCacheStore {
    pool: PgPool,
}

impl PostgresCacheStore {
    /// Connects a new pool from the given configuration.
    pub async fn from_config(config: &PostgresConfig) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| StorageError::ConnectionError {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Wraps an existing pool (useful for tests sharing a pool).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the schema if it does not exist.
    pub async fn run_migrations(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                payload_id     TEXT PRIMARY KEY,
                input_payload  TEXT NOT NULL,
                output_payload TEXT NOT NULL,
                created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

/// Maps sqlx errors onto the storage taxonomy.
fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::Io(e) => StorageError::ConnectionError {
            message: e.to_string(),
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StorageError::ConnectionError {
            message: err.to_string(),
        },
        other => StorageError::QueryError {
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl CacheStore for PostgresCacheStore {
    #[instrument(skip(self))]
    async fn exists(&self, payload_id: &str) -> StorageResult<bool> {
        let found: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM cache_entries WHERE payload_id = $1")
                .bind(payload_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(found.is_some())
    }

    #[instrument(skip(self))]
    async fn get(&self, payload_id: &str) -> StorageResult<CacheEntry> {
        let row: Option<(String, String, String, chrono::DateTime<chrono::Utc>)> = sqlx::query_as(
            "SELECT payload_id, input_payload, output_payload, created_at \
             FROM cache_entries WHERE payload_id = $1",
        )
        .bind(payload_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some((payload_id, input_payload, output_payload, created_at)) => Ok(CacheEntry {
                payload_id,
                input_payload,
                output_payload,
                created_at,
            }),
            None => Err(StorageError::EntryNotFound {
                payload_id: payload_id.to_string(),
            }),
        }
    }

    #[instrument(skip(self, entry), fields(payload_id = %entry.payload_id))]
    async fn put(&self, entry: CacheEntry) -> StorageResult<()> {
        let result = sqlx::query(
            "INSERT INTO cache_entries (payload_id, input_payload, output_payload, created_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (payload_id) DO NOTHING",
        )
        .bind(&entry.payload_id)
        .bind(&entry.input_payload)
        .bind(&entry.output_payload)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::DuplicateEntry {
                payload_id: entry.payload_id,
            });
        }

        Ok(())
    }
}
