//! Configuration management for the idemcache server.
//!
//! Configuration is assembled from three sources, later ones overriding
//! earlier ones:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables
//!
//! Environment variables are prefixed with `IDEMCACHE_` and use `__` as
//! the nested-key separator, e.g. `IDEMCACHE_SERVER__PORT=9090` overrides
//! `server.port`.
//!
//! # Example
//!
//! ```ignore
//! use idemcache_server::config::ServerConfig;
//!
//! // Load from file with env overrides
//! let config = ServerConfig::load("config.yaml")?;
//!
//! // Or load from environment only
//! let config = ServerConfig::from_env()?;
//! ```

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use idemcache_domain::registry::RegistryConfig;
use idemcache_domain::transform::TransformLimits;

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Network settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Transformer size limits
    #[serde(default)]
    pub limits: LimitSettings,

    /// Fast-path registry settings
    #[serde(default)]
    pub registry: RegistrySettings,
}

/// Server network settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum request body size in bytes
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_body_limit_bytes() -> usize {
    1024 * 1024
}

/// Storage backend settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageSettings {
    /// Storage backend: "memory" or "postgres"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Database connection URL (required for postgres)
    #[serde(default)]
    pub database_url: Option<String>,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_url: None,
            pool_size: default_pool_size(),
            connection_timeout_secs: default_connection_timeout(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_connection_timeout() -> u64 {
    30
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON log format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Transformer size limits.
///
/// Environment overrides: `IDEMCACHE_LIMITS__MAX_ITEMS`,
/// `IDEMCACHE_LIMITS__MAX_ITEM_CHARS`, `IDEMCACHE_LIMITS__MAX_OUTPUT_CHARS`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LimitSettings {
    /// Maximum elements per input list
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Maximum normalized length of a single element
    #[serde(default = "default_max_item_chars")]
    pub max_item_chars: usize,

    /// Maximum length of the joined output
    #[serde(default = "default_max_output_chars")]
    pub max_output_chars: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            max_item_chars: default_max_item_chars(),
            max_output_chars: default_max_output_chars(),
        }
    }
}

impl LimitSettings {
    /// Converts into the domain transformer limits.
    pub fn to_transform_limits(&self) -> TransformLimits {
        TransformLimits::default()
            .with_max_items(self.max_items)
            .with_max_item_chars(self.max_item_chars)
            .with_max_output_chars(self.max_output_chars)
    }
}

fn default_max_items() -> usize {
    100_000
}

fn default_max_item_chars() -> usize {
    8_192
}

fn default_max_output_chars() -> usize {
    5_000_000
}

/// Fast-path registry settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RegistrySettings {
    /// Maximum memoized outputs held in memory
    #[serde(default = "default_registry_max_entries")]
    pub max_entries: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            max_entries: default_registry_max_entries(),
        }
    }
}

impl RegistrySettings {
    /// Converts into the domain registry configuration.
    pub fn to_registry_config(&self) -> RegistryConfig {
        RegistryConfig::default().with_max_entries(self.max_entries)
    }
}

fn default_registry_max_entries() -> usize {
    100_000
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(
                Environment::with_prefix("IDEMCACHE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(
                Environment::with_prefix("IDEMCACHE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.server.port == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        let valid_backends = ["memory", "postgres"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "storage.backend must be one of: {:?}, got: {}",
                    valid_backends, self.storage.backend
                ),
            });
        }

        if self.storage.backend == "postgres"
            && self
                .storage
                .database_url
                .as_deref()
                .map_or(true, |s| s.trim().is_empty())
        {
            return Err(ConfigLoadError::Invalid {
                message: "storage.database_url is required when backend is 'postgres'".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        if self.limits.max_items == 0 || self.limits.max_output_chars == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "limits.max_items and limits.max_output_chars must be positive"
                    .to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    #[serial]
    fn loads_config_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server:
  host: "127.0.0.1"
  port: 9090

storage:
  backend: memory
  pool_size: 20

logging:
  level: debug
  json: true

limits:
  max_items: 500
"#
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.storage.pool_size, 20);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.limits.max_items, 500);
        // Untouched sections keep their defaults.
        assert_eq!(config.limits.max_item_chars, 8_192);
        assert_eq!(config.registry.max_entries, 100_000);
    }

    #[test]
    #[serial]
    fn missing_file_is_an_error() {
        let err = ServerConfig::load("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigLoadError::FileNotFound { .. }));
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 9090\n").unwrap();

        std::env::set_var("IDEMCACHE_SERVER__PORT", "7171");
        let config = ServerConfig::load(file.path());
        std::env::remove_var("IDEMCACHE_SERVER__PORT");

        assert_eq!(config.unwrap().server.port, 7171);
    }

    #[test]
    #[serial]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.storage.backend, "memory");
    }

    #[test]
    #[serial]
    fn postgres_backend_requires_database_url() {
        let mut config = ServerConfig::default();
        config.storage.backend = "postgres".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::Invalid { .. })
        ));

        config.storage.database_url = Some("postgres://localhost/idemcache".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn unknown_backend_is_rejected() {
        let mut config = ServerConfig::default();
        config.storage.backend = "redis".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::Invalid { .. })
        ));
    }

    #[test]
    fn limit_settings_convert_to_transform_limits() {
        let settings = LimitSettings {
            max_items: 10,
            max_item_chars: 20,
            max_output_chars: 30,
        };
        let limits = settings.to_transform_limits();
        assert_eq!(limits.max_items, 10);
        assert_eq!(limits.max_item_chars, 20);
        assert_eq!(limits.max_output_chars, 30);
    }
}
