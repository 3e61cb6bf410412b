//! Dashboard configuration.
//!
//! Settings come from a TOML file (`TASKPULSE_CONFIG`, else
//! `./taskpulse.toml`), fall back to defaults when the file is absent, and
//! are then overridden by `TASKPULSE_*` environment variables. Loading does
//! not validate; call [`DashboardConfig::validate`] afterwards.

mod error;
mod sections;

pub use error::{ConfigError, ConfigResult};
pub use sections::{BoardConfig, DatabaseConfig, LoggingConfig, SensorConfig};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "TASKPULSE_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "taskpulse.toml";

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Remote store connection.
    pub database: DatabaseConfig,
    /// Log output.
    pub logging: LoggingConfig,
    /// Temperature alerting.
    pub sensors: SensorConfig,
    /// Task board presentation.
    pub board: BoardConfig,
}

impl DashboardConfig {
    /// Loads configuration from the default location and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        let mut config = Self::load_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads configuration from `path`, or defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `TASKPULSE_*` overrides read through `lookup`.
    ///
    /// Values that fail to parse are ignored and the previous setting kept.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TASKPULSE_DATABASE_URL") {
            self.database.url = url;
        }
        override_parsed(
            &lookup,
            "TASKPULSE_DATABASE_MAX_CONNECTIONS",
            &mut self.database.max_connections,
        );
        if let Some(level) = lookup("TASKPULSE_LOG_LEVEL") {
            self.logging.level = level;
        }
        override_parsed(&lookup, "TASKPULSE_LOG_JSON", &mut self.logging.json);
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad setting.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::invalid("database.url", "must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid(
                "database.max_connections",
                "must be at least 1",
            ));
        }
        let sensors = &self.sensors;
        if !sensors.normal_min_celsius.is_finite() || !sensors.normal_max_celsius.is_finite() {
            return Err(ConfigError::invalid(
                "sensors.normal_min_celsius",
                "range bounds must be finite",
            ));
        }
        if sensors.normal_min_celsius > sensors.normal_max_celsius {
            return Err(ConfigError::invalid(
                "sensors.normal_min_celsius",
                format!(
                    "{} exceeds normal_max_celsius {}",
                    sensors.normal_min_celsius, sensors.normal_max_celsius
                ),
            ));
        }
        Ok(())
    }

    /// Logs a summary of the effective configuration without credentials.
    pub fn log_summary(&self) {
        info!(
            max_connections = self.database.max_connections,
            timeout_secs = self.database.connection_timeout_secs,
            log_level = %self.logging.level,
            log_json = self.logging.json,
            normal_min = self.sensors.normal_min_celsius,
            normal_max = self.sensors.normal_max_celsius,
            alert_limit = self.sensors.alert_limit,
            locale = %self.board.locale,
            "configuration loaded"
        );
    }
}

fn override_parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    if let Some(value) = lookup(key).and_then(|raw| raw.trim().parse().ok()) {
        *target = value;
    }
}
