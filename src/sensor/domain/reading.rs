//! Temperature readings and their trend.

use super::{SensorDomainError, SensorKey};
use crate::session::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One temperature sample, in degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    owner: UserId,
    sensor_key: SensorKey,
    temperature: f64,
    timestamp: DateTime<Utc>,
}

impl TemperatureReading {
    /// Creates a reading for `sensor_key`.
    ///
    /// # Errors
    ///
    /// Returns [`SensorDomainError::InvalidTemperature`] when `temperature`
    /// is NaN or infinite.
    pub fn new(
        owner: UserId,
        sensor_key: SensorKey,
        temperature: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, SensorDomainError> {
        if !temperature.is_finite() {
            return Err(SensorDomainError::InvalidTemperature(temperature.to_string()));
        }
        Ok(Self {
            owner,
            sensor_key,
            temperature,
            timestamp,
        })
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the key of the sensor that produced the reading.
    #[must_use]
    pub const fn sensor_key(&self) -> &SensorKey {
        &self.sensor_key
    }

    /// Returns the temperature in °C.
    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns when the reading was taken.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Direction of the two most recent readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    /// The latest reading is warmer.
    Rising,
    /// The latest reading is cooler.
    Falling,
    /// Equal readings, or fewer than two.
    Steady,
}

impl Trend {
    /// Compares the last two readings of a chronological sequence.
    #[must_use]
    pub fn of(readings: &[TemperatureReading]) -> Self {
        match readings {
            [.., previous, latest] => Self::between(latest.temperature, previous.temperature),
            _ => Self::Steady,
        }
    }

    /// Compares `latest` against `previous`.
    #[must_use]
    pub fn between(latest: f64, previous: f64) -> Self {
        match latest.partial_cmp(&previous) {
            Some(std::cmp::Ordering::Greater) => Self::Rising,
            Some(std::cmp::Ordering::Less) => Self::Falling,
            _ => Self::Steady,
        }
    }
}
