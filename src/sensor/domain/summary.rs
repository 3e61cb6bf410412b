//! Sensor list rows.

use super::{Sensor, TemperatureReading};

/// A sensor with its most recent reading, as shown on the sensor list.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSummary {
    sensor: Sensor,
    latest: Option<TemperatureReading>,
}

impl SensorSummary {
    /// Pairs a sensor with its latest reading.
    #[must_use]
    pub const fn new(sensor: Sensor, latest: Option<TemperatureReading>) -> Self {
        Self { sensor, latest }
    }

    /// Returns the sensor.
    #[must_use]
    pub const fn sensor(&self) -> &Sensor {
        &self.sensor
    }

    /// Returns the latest reading, if any.
    #[must_use]
    pub const fn latest(&self) -> Option<&TemperatureReading> {
        self.latest.as_ref()
    }

    /// Swaps in an edited sensor, keeping the latest reading.
    pub fn replace_sensor(&mut self, sensor: Sensor) {
        self.sensor = sensor;
    }
}
