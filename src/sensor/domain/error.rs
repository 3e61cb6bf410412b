//! Error types for sensor validation and parsing.

use thiserror::Error;

/// Errors returned while validating sensor input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SensorDomainError {
    /// The sensor key is empty after trimming.
    #[error("sensor key must not be empty")]
    EmptyKey,

    /// The sensor name is empty after trimming.
    #[error("sensor name must not be empty")]
    EmptyName,

    /// An edit tried to change the key of an existing sensor.
    #[error("sensor key {current} cannot be changed to {requested}")]
    KeyChanged {
        /// Key stored for the sensor.
        current: String,
        /// Key the edit asked for.
        requested: String,
    },

    /// A temperature value is not a finite number.
    #[error("invalid temperature: {0}")]
    InvalidTemperature(String),
}

/// Error returned while parsing sensor statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sensor status: {0}")]
pub struct ParseSensorStatusError(pub String);

/// Error returned while parsing time range names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown time range: {0}")]
pub struct ParseTimeRangeError(pub String);
