//! idemcache server binary
//!
//! Content-addressed cache service for the interleave transformation.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! idemcache --config config.yaml
//!
//! # With environment variables only
//! IDEMCACHE_STORAGE__BACKEND=memory idemcache
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, Level};

use idemcache_api::http::{create_router_with_body_limit, AppState};
use idemcache_api::observability::{init_logging, LoggingConfig};
use idemcache_server::ServerConfig;
use idemcache_storage::{CacheStore, MemoryCacheStore, PostgresCacheStore, PostgresConfig};

/// idemcache - Content-addressed payload cache service
#[derive(Parser, Debug)]
#[command(name = "idemcache")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if let Some(config_path) = args.config {
        ServerConfig::load(&config_path)?
    } else {
        ServerConfig::from_env()?
    };

    let log_config = LoggingConfig {
        json_format: config.logging.json,
        default_level: parse_log_level(&config.logging.level),
    };
    init_logging(log_config);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting idemcache server");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    match config.storage.backend.as_str() {
        "memory" => {
            info!("Using in-memory storage backend");
            let storage = Arc::new(MemoryCacheStore::new());
            run_server(storage, addr, &config).await
        }
        "postgres" => {
            let database_url = config
                .storage
                .database_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("storage.database_url is required for postgres"))?;

            info!("Connecting to PostgreSQL database");
            let pg_config = PostgresConfig {
                database_url,
                max_connections: config.storage.pool_size,
                min_connections: 1,
                connect_timeout_secs: config.storage.connection_timeout_secs,
            };

            let storage = PostgresCacheStore::from_config(&pg_config).await?;
            info!("PostgreSQL connection established");

            info!("Running database migrations");
            storage.run_migrations().await?;
            info!("Database migrations complete");

            run_server(Arc::new(storage), addr, &config).await
        }
        other => anyhow::bail!("Unknown storage backend: {other}"),
    }
}

/// Run the HTTP server with graceful shutdown.
async fn run_server<S>(storage: Arc<S>, addr: SocketAddr, config: &ServerConfig) -> anyhow::Result<()>
where
    S: CacheStore,
{
    let state = AppState::with_config(
        storage,
        config.limits.to_transform_limits(),
        config.registry.to_registry_config(),
    );
    let router = create_router_with_body_limit(state, config.server.body_limit_bytes);

    info!(%addr, "HTTP server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

/// Parse log level from string.
fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
