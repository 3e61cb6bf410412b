//! Out-of-range temperature alerts.

use super::TemperatureReading;
use chrono::{DateTime, Utc};

/// Which side of the normal range a reading fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// Above the normal maximum.
    High,
    /// Below the normal minimum.
    Low,
}

/// Alert raised for one out-of-range reading.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureAlert {
    kind: AlertKind,
    temperature: f64,
    timestamp: DateTime<Utc>,
}

impl TemperatureAlert {
    /// Returns the side of the range.
    #[must_use]
    pub const fn kind(&self) -> AlertKind {
        self.kind
    }

    /// Returns the offending temperature.
    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns when the reading was taken.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the alert text, e.g. `Temperatura alta: 31.2°C`.
    #[must_use]
    pub fn message(&self) -> String {
        match self.kind {
            AlertKind::High => format!("Temperatura alta: {}°C", self.temperature),
            AlertKind::Low => format!("Temperatura baixa: {}°C", self.temperature),
        }
    }
}

/// Normal temperature range and how many alerts to keep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertPolicy {
    normal_min: f64,
    normal_max: f64,
    limit: usize,
}

impl AlertPolicy {
    /// Creates a policy; both bounds belong to the normal range.
    #[must_use]
    pub const fn new(normal_min: f64, normal_max: f64, limit: usize) -> Self {
        Self {
            normal_min,
            normal_max,
            limit,
        }
    }

    /// Returns the lowest normal temperature.
    #[must_use]
    pub const fn normal_min(&self) -> f64 {
        self.normal_min
    }

    /// Returns the highest normal temperature.
    #[must_use]
    pub const fn normal_max(&self) -> f64 {
        self.normal_max
    }

    /// Returns the number of alerts kept.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Classifies a temperature; `None` inside the normal range.
    #[must_use]
    pub fn classify(&self, temperature: f64) -> Option<AlertKind> {
        if temperature > self.normal_max {
            Some(AlertKind::High)
        } else if temperature < self.normal_min {
            Some(AlertKind::Low)
        } else {
            None
        }
    }

    /// Returns alerts for the most recent out-of-range readings of a
    /// chronological sequence, oldest first, at most [`Self::limit`].
    #[must_use]
    pub fn alerts(&self, readings: &[TemperatureReading]) -> Vec<TemperatureAlert> {
        let all: Vec<TemperatureAlert> = readings
            .iter()
            .filter_map(|reading| {
                self.classify(reading.temperature())
                    .map(|kind| TemperatureAlert {
                        kind,
                        temperature: reading.temperature(),
                        timestamp: reading.timestamp(),
                    })
            })
            .collect();
        let skip = all.len().saturating_sub(self.limit);
        all.into_iter().skip(skip).collect()
    }
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self::new(15.0, 30.0, 10)
    }
}
