//! Configuration module for filedepot.

use serde::Deserialize;
use std::path::Path;

use crate::file::{DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_QUOTA_MB};
use crate::{DepotError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/filedepot.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Directory where uploaded files are placed.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Maximum size of a single upload in megabytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: f64,
    /// Quota given to users created without an explicit one, in megabytes.
    #[serde(default = "default_quota")]
    pub default_quota_mb: f64,
}

fn default_storage_path() -> String {
    "uploaded".to_string()
}

fn default_max_file_size() -> f64 {
    DEFAULT_MAX_FILE_SIZE_MB
}

fn default_quota() -> f64 {
    DEFAULT_QUOTA_MB
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            max_file_size_mb: default_max_file_size(),
            default_quota_mb: default_quota(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/filedepot.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// File storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DepotError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DepotError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEDEPOT_DATABASE_PATH`: Override the database file path
    /// - `FILEDEPOT_STORAGE_PATH`: Override the file storage directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("FILEDEPOT_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(path) = std::env::var("FILEDEPOT_STORAGE_PATH") {
            if !path.is_empty() {
                self.files.storage_path = path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.files.storage_path.trim().is_empty() {
            return Err(DepotError::Config(
                "files.storage_path must not be empty".to_string(),
            ));
        }
        if self.files.max_file_size_mb.is_nan() || self.files.max_file_size_mb <= 0.0 {
            return Err(DepotError::Config(
                "files.max_file_size_mb must be greater than zero".to_string(),
            ));
        }
        if self.files.default_quota_mb < 0.0 {
            return Err(DepotError::Config(
                "files.default_quota_mb must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
