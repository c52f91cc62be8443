use crate::domain::config_types::{
    DatabaseName, DatabasePassword, DatabaseUsername, LatencyMs, LogFormat, LogLevel,
    MaxConnections, Port, RepositoryBackend,
};
use crate::domain::validation_constants::latency;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

pub use config::ConfigError;

/// Directory searched for configuration files by [`Settings::new`]
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Prefix for environment overrides, e.g. `FIELD_MONITORING__REPOSITORY__BACKEND`
pub const ENV_PREFIX: &str = "FIELD_MONITORING";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub repository: RepositorySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub name: String,
    pub environment: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: Port,
    pub username: DatabaseUsername,
    pub password: DatabasePassword,
    pub database_name: DatabaseName,
    pub max_connections: MaxConnections,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RepositorySettings {
    pub backend: RepositoryBackend,
    pub simulated_latency_ms: LatencyMs,
    pub latency_jitter_ms: LatencyMs,
    pub seed_fixtures: bool,
}

impl RepositorySettings {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms.into_inner())
    }

    pub fn latency_jitter(&self) -> Duration {
        Duration::from_millis(self.latency_jitter_ms.into_inner())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        Self::load_from(Path::new(DEFAULT_CONFIG_DIR), &environment)
    }

    /// Layer defaults, `default`, `{environment}` and `local` files from
    /// `dir`, then environment variables
    pub fn load_from(dir: &Path, environment: &str) -> Result<Self, ConfigError> {
        let file = |name: &str| File::with_name(&dir.join(name).to_string_lossy()).required(false);

        let config = Config::builder()
            // Start with default values
            .set_default("application.name", "field_monitoring")?
            .set_default("application.environment", environment)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.username", "postgres")?
            .set_default("database.password", "password")?
            .set_default("database.database_name", "field_monitoring")?
            .set_default("database.max_connections", 10)?
            .set_default("repository.backend", RepositoryBackend::default().as_str())?
            .set_default("repository.simulated_latency_ms", latency::DEFAULT_BASE_MS as i64)?
            .set_default("repository.latency_jitter_ms", latency::DEFAULT_JITTER_MS as i64)?
            .set_default("repository.seed_fixtures", true)?
            .set_default("logging.level", LogLevel::default().as_str())?
            .set_default("logging.format", LogFormat::default().as_str())?
            .add_source(file("default"))
            .add_source(file(environment))
            .add_source(file("local"))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.database.username,
            self.database.password.as_ref(),
            self.database.host,
            self.database.port,
            self.database.database_name
        )
    }
}
