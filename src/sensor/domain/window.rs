//! Time windows over readings.

use super::{ParseTimeRangeError, TemperatureReading};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Period of readings shown on the monitor page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    /// Last hour.
    #[serde(rename = "hora")]
    Hour,
    /// Last 24 hours.
    #[default]
    #[serde(rename = "dia")]
    Day,
    /// Last 7 days.
    #[serde(rename = "semana")]
    Week,
    /// Last 30 days.
    #[serde(rename = "mês")]
    Month,
    /// Everything.
    #[serde(rename = "todos")]
    All,
}

impl TimeRange {
    /// Every range from shortest to unbounded.
    pub const ALL: [Self; 5] = [Self::Hour, Self::Day, Self::Week, Self::Month, Self::All];

    /// Returns the range key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hora",
            Self::Day => "dia",
            Self::Week => "semana",
            Self::Month => "mês",
            Self::All => "todos",
        }
    }

    /// Returns the selector label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hour => "Última Hora",
            Self::Day => "Último Dia",
            Self::Week => "Última Semana",
            Self::Month => "Último Mês",
            Self::All => "Todos os Dados",
        }
    }

    /// Returns the window length, or `None` for [`TimeRange::All`].
    #[must_use]
    pub const fn window(self) -> Option<Duration> {
        match self {
            Self::Hour => Some(Duration::hours(1)),
            Self::Day => Some(Duration::days(1)),
            Self::Week => Some(Duration::days(7)),
            Self::Month => Some(Duration::days(30)),
            Self::All => None,
        }
    }

    /// Returns `true` when a reading taken at `timestamp` falls in the
    /// window ending at `now`. The lower bound is inclusive.
    #[must_use]
    pub fn contains(self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.window().is_none_or(|window| timestamp >= now - window)
    }

    /// Keeps the readings inside the window ending at `now`, in order.
    #[must_use]
    pub fn filter(
        self,
        readings: &[TemperatureReading],
        now: DateTime<Utc>,
    ) -> Vec<TemperatureReading> {
        readings
            .iter()
            .filter(|reading| self.contains(reading.timestamp(), now))
            .cloned()
            .collect()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TimeRange {
    type Error = ParseTimeRangeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == trimmed)
            .ok_or_else(|| ParseTimeRangeError(value.to_owned()))
    }
}
