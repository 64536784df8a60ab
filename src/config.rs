//! Configuration module for orgdrive.

use serde::Deserialize;
use std::path::Path;

use crate::{DriveError, Result};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
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
    "data/orgdrive.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the blob storage directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Seconds between purge sweeper passes.
    #[serde(default = "default_purge_interval")]
    pub purge_interval_secs: u64,
    /// Seconds a soft-deleted file must age before it is purged.
    #[serde(default = "default_purge_grace")]
    pub purge_grace_secs: u64,
    /// Seconds an issued upload token stays valid.
    #[serde(default = "default_upload_token_ttl")]
    pub upload_token_ttl_secs: u64,
}

fn default_storage_path() -> String {
    "data/blobs".to_string()
}

fn default_purge_interval() -> u64 {
    300
}

fn default_purge_grace() -> u64 {
    86400
}

fn default_upload_token_ttl() -> u64 {
    600
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            purge_interval_secs: default_purge_interval(),
            purge_grace_secs: default_purge_grace(),
            upload_token_ttl_secs: default_upload_token_ttl(),
        }
    }
}

/// File-name search configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Whether substring matching against file names ignores case.
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
}

fn default_case_insensitive() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_insensitive: default_case_insensitive(),
        }
    }
}

/// Identity-provider webhook configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WebhookConfig {
    /// Shared secret expected in the X-Webhook-Secret header.
    ///
    /// Empty disables the check (tests, local development).
    #[serde(default)]
    pub secret: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path. Empty means console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Search settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Webhook settings.
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| DriveError::Config(e.to_string()))
    }
}
