use std::env;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::info;

const CONFIG_DIR: &str = "config";
const DEFAULT_ENV: &str = "development";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub db_min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub db_connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub db_idle_timeout_secs: u64,

    #[serde(default = "default_acquire_timeout")]
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    /// Construct a configuration directly; used by tests and embedding code
    /// that does not go through [`load_config`].
    pub fn new(database_url: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            environment: environment.into(),
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            db_max_connections: default_max_connections(),
            db_min_connections: default_min_connections(),
            db_connect_timeout_secs: default_connect_timeout(),
            db_idle_timeout_secs: default_idle_timeout(),
            db_acquire_timeout_secs: default_acquire_timeout(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_acquire_timeout() -> u64 {
    8
}

/// Load configuration from `config/` files and `APP__`-prefixed environment
/// variables, falling back to built-in defaults.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting the config profile.
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://marketplace.db?mode=rwc")?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    config.try_deserialize()
}

/// Initialize the tracing subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("marketplace_core={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);
    let filter = EnvFilter::try_new(filter_directive).unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let cfg = AppConfig::new("sqlite::memory:", "test");
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.environment, "test");
        assert_eq!(cfg.log_level(), DEFAULT_LOG_LEVEL);
        assert!(!cfg.auto_migrate);
        assert!(!cfg.is_production());
    }

    #[test]
    fn production_flag() {
        let cfg = AppConfig::new("sqlite::memory:", "production");
        assert!(cfg.is_production());
    }
}
