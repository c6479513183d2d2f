//! Configuration for the lookup service.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{ConsultaError, ConsultaResult};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "consulta-cnpj.toml";

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Database and connection pool settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Record cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file holding the `estabelecimento`, `empresa` and `munic` tables.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Idle connections kept open by the pool.
    #[serde(default = "default_pool_min")]
    pub pool_min: u32,

    /// Hard limit of open connections.
    #[serde(default = "default_pool_max")]
    pub pool_max: u32,

    /// How long `get_connection` blocks on an exhausted pool (in milliseconds).
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_ms: u64,

    /// Deadline for a single lookup query (in milliseconds).
    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,

    /// SQLite busy handler timeout (in milliseconds).
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    /// Creates a configuration pointing at `path` with default pool bounds.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_min: default_pool_min(),
            pool_max: default_pool_max(),
            acquire_timeout_ms: default_acquire_timeout(),
            query_timeout_ms: default_query_timeout(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("dados_rfb.db")
}

fn default_pool_min() -> u32 {
    5
}

fn default_pool_max() -> u32 {
    20
}

fn default_acquire_timeout() -> u64 {
    5_000
}

fn default_query_timeout() -> u64 {
    2_000
}

fn default_busy_timeout() -> u64 {
    1_000
}

/// LRU cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum cache capacity (number of records).
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

pub(crate) fn default_cache_capacity() -> usize {
    10_000
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConsultaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConsultaResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
        }
    }

    /// Checks cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> ConsultaResult<()> {
        let db = &self.database;
        if db.pool_max == 0 {
            return Err(ConsultaError::config("database.pool_max must be at least 1"));
        }
        if db.pool_min > db.pool_max {
            return Err(ConsultaError::config(format!(
                "database.pool_min ({}) exceeds database.pool_max ({})",
                db.pool_min, db.pool_max
            )));
        }
        if !matches!(self.general.log_format.as_str(), "text" | "json") {
            return Err(ConsultaError::config(format!(
                "unknown log format '{}'",
                self.general.log_format
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
