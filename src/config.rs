use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::MatchLimits;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Verification of the identity provider's bearer tokens
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Shared secret for HS* algorithms, PEM public key otherwise
    pub key: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

fn default_algorithm() -> String { "HS256".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: u32,
    #[serde(default = "default_partner_limit")]
    pub partner_limit: usize,
    #[serde(default = "default_teacher_limit")]
    pub teacher_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            candidate_pool: default_candidate_pool(),
            partner_limit: default_partner_limit(),
            teacher_limit: default_teacher_limit(),
        }
    }
}

impl MatchingSettings {
    pub fn limits(&self) -> MatchLimits {
        MatchLimits {
            partners: self.partner_limit,
            teachers: self.teacher_limit,
        }
    }
}

fn default_candidate_pool() -> u32 { 100 }
fn default_partner_limit() -> usize { 6 }
fn default_teacher_limit() -> usize { 4 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with BALLROOM_)
    /// 5. DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., BALLROOM__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("BALLROOM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("BALLROOM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// DATABASE_URL takes precedence over the configured database.url
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
