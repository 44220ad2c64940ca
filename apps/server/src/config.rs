//! # Server Configuration
//!
//! Layered configuration for the HTTP server.
//!
//! ## Load Order (later overrides earlier)
//! 1. Default values
//! 2. Config file (`stockbook.toml`)
//! 3. Environment variables (`STOCKBOOK_*`)
//!
//! ## Example stockbook.toml
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 5000
//! cors_allow_any = true
//!
//! [database]
//! path = "/var/lib/stockbook/stockbook.db"
//! max_connections = 5
//!
//! [logging]
//! filter = "info,stockbook=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use stockbook_db::DbConfig;
use thiserror::Error;
use tracing::debug;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default tracing filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,stockbook=debug,sqlx=warn";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "STOCKBOOK_CONFIG";

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub port: u16,
    /// Allow cross-origin requests from any origin (SPA served elsewhere).
    pub cors_allow_any: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            cors_allow_any: true,
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: PathBuf::from("stockbook.db"),
            max_connections: 5,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

// =============================================================================
// ServerConfig
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ServerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// `config_path` comes from `--config`; when absent, `STOCKBOOK_CONFIG`
    /// and then the platform config directory are tried. A missing file
    /// means defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path).map_err(|source| {
                    ConfigError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                Self::from_toml_str(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document; missing sections and keys take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `STOCKBOOK_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("STOCKBOOK_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("STOCKBOOK_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STOCKBOOK_PORT".to_string()))?;
        }

        if let Some(path) = lookup("STOCKBOOK_DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("STOCKBOOK_MAX_CONNECTIONS") {
            self.database.max_connections = max
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STOCKBOOK_MAX_CONNECTIONS".to_string()))?;
        }

        if let Some(filter) = lookup("STOCKBOOK_LOG") {
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be greater than 0".into()));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path cannot be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        self.socket_addr()?;
        Ok(())
    }

    /// The address the HTTP listener binds.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .bind_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("server.bind_addr".to_string()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Database pool settings derived from `[database]`.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockbook", "stockbook")
            .map(|dirs| dirs.config_dir().join("stockbook.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
