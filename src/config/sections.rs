//! Individual configuration sections.

use crate::sensor::domain::AlertPolicy;
use crate::task::domain::Locale;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/taskpulse";
const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Remote store connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Returns the connection checkout timeout.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_DATABASE_URL),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from(DEFAULT_LOG_LEVEL),
            json: false,
        }
    }
}

/// Temperature alerting settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Lowest temperature considered normal, in °C.
    pub normal_min_celsius: f64,
    /// Highest temperature considered normal, in °C.
    pub normal_max_celsius: f64,
    /// Number of recent alerts kept for display.
    pub alert_limit: usize,
}

impl SensorConfig {
    /// Builds the alert policy described by this section.
    #[must_use]
    pub const fn alert_policy(&self) -> AlertPolicy {
        AlertPolicy::new(
            self.normal_min_celsius,
            self.normal_max_celsius,
            self.alert_limit,
        )
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        let policy = AlertPolicy::default();
        Self {
            normal_min_celsius: policy.normal_min(),
            normal_max_celsius: policy.normal_max(),
            alert_limit: policy.limit(),
        }
    }
}

/// Task board presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Language used for column headings.
    pub locale: Locale,
}
