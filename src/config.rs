//! Configuration module for bhub.

use serde::Deserialize;
use std::path::Path;

use crate::{BhubError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins (empty = same-origin only).
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
    /// Path to the SQLite database file (or connection URL for PostgreSQL).
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/bhub.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Site information configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Name of the site.
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Description of the site.
    #[serde(default = "default_site_description")]
    pub description: String,
}

fn default_site_name() -> String {
    "bhub".to_string()
}

fn default_site_description() -> String {
    "Content repository for behavior analysis research".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            description: default_site_description(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret key for signing JWT access tokens.
    ///
    /// Overridable via the `BHUB_JWT_SECRET` environment variable.
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token expiry in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiry in days.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_days: u64,
    /// Username for the bootstrap admin account (created when no users exist).
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    /// Password for the bootstrap admin account.
    #[serde(default)]
    pub admin_password: String,
}

fn default_access_token_expiry() -> u64 {
    900
}

fn default_refresh_token_expiry() -> u64 {
    7
}

fn default_admin_username() -> String {
    "admin".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_expiry_secs: default_access_token_expiry(),
            refresh_token_expiry_days: default_refresh_token_expiry(),
            admin_username: default_admin_username(),
            admin_password: String::new(),
        }
    }
}

/// Feed synchronization configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Whether the in-process background sync loop runs.
    ///
    /// Leave disabled when an external scheduler drives `/api/cron/sync`.
    #[serde(default)]
    pub background_enabled: bool,
    /// Background check interval in seconds.
    #[serde(default = "default_sync_interval")]
    pub interval_secs: u64,
    /// Maximum number of entries ingested per feed per sync.
    #[serde(default = "default_max_items")]
    pub max_items_per_feed: usize,
}

fn default_sync_interval() -> u64 {
    3600
}

fn default_max_items() -> usize {
    100
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            background_enabled: false,
            interval_secs: default_sync_interval(),
            max_items_per_feed: default_max_items(),
        }
    }
}

/// Retention configuration for the cleanup job.
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// Articles older than this many days are eligible for cleanup.
    #[serde(default = "default_retention_days")]
    pub days: i64,
    /// Soft-archive old articles instead of deleting them.
    #[serde(default)]
    pub archive_instead_of_delete: bool,
}

fn default_retention_days() -> i64 {
    365
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days: default_retention_days(),
            archive_instead_of_delete: false,
        }
    }
}

/// Cron endpoint configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CronConfig {
    /// Shared secret required in the `x-cron-secret` header.
    ///
    /// Overridable via the `BHUB_CRON_SECRET` environment variable.
    /// When empty, the cron endpoints are disabled.
    #[serde(default)]
    pub secret: String,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding HTTP service. Empty disables the feature.
    #[serde(default)]
    pub service_url: String,
    /// Number of candidate articles considered for similarity ranking.
    #[serde(default = "default_similarity_candidates")]
    pub similarity_candidates: usize,
}

fn default_similarity_candidates() -> usize {
    200
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            service_url: String::new(),
            similarity_candidates: default_similarity_candidates(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file (empty = console only).
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/bhub.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Site information.
    #[serde(default)]
    pub site: SiteConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Feed sync settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Retention settings.
    #[serde(default)]
    pub retention: RetentionConfig,
    /// Cron endpoint settings.
    #[serde(default)]
    pub cron: CronConfig,
    /// Embedding provider settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| BhubError::Config(format!("failed to parse config: {e}")))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides for secrets.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("BHUB_JWT_SECRET") {
            if !secret.is_empty() {
                self.auth.jwt_secret = secret;
            }
        }
        if let Ok(secret) = std::env::var("BHUB_CRON_SECRET") {
            if !secret.is_empty() {
                self.cron.secret = secret;
            }
        }
    }

    /// Validate settings that have no sensible fallback.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(BhubError::Config(
                "auth.jwt_secret must be set (or BHUB_JWT_SECRET)".to_string(),
            ));
        }
        if self.retention.days <= 0 {
            return Err(BhubError::Config(
                "retention.days must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
