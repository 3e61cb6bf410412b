//! Summary statistics over readings.

use super::TemperatureReading;

/// Text shown when there are no readings to summarise.
pub const NOT_AVAILABLE: &str = "N/A";

/// Average, extremes and count of a set of readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureStats {
    average: f64,
    min: f64,
    max: f64,
    count: usize,
}

impl TemperatureStats {
    /// Summarises `readings`; `None` when there are none.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the average of readings is a floating-point mean"
    )]
    pub fn from_readings(readings: &[TemperatureReading]) -> Option<Self> {
        let first = readings.first()?.temperature();
        let (sum, min, max) = readings.iter().skip(1).fold(
            (first, first, first),
            |(sum, min, max), reading| {
                let value = reading.temperature();
                (sum + value, min.min(value), max.max(value))
            },
        );
        let count = readings.len();
        let divisor = f64::from(u32::try_from(count).unwrap_or(u32::MAX));
        Some(Self {
            average: sum / divisor,
            min,
            max,
            count,
        })
    }

    /// Returns the mean temperature.
    #[must_use]
    pub const fn average(&self) -> f64 {
        self.average
    }

    /// Returns the lowest temperature.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Returns the highest temperature.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Returns the number of readings.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Formats the stats for display.
    #[must_use]
    pub fn display(&self) -> StatsDisplay {
        StatsDisplay::from(Some(*self))
    }
}

/// Stats formatted for the stats cards: one decimal, or `N/A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsDisplay {
    /// Mean temperature.
    pub average: String,
    /// Lowest temperature.
    pub min: String,
    /// Highest temperature.
    pub max: String,
    /// Number of readings.
    pub count: usize,
}

impl From<Option<TemperatureStats>> for StatsDisplay {
    fn from(stats: Option<TemperatureStats>) -> Self {
        stats.map_or_else(
            || Self {
                average: NOT_AVAILABLE.to_owned(),
                min: NOT_AVAILABLE.to_owned(),
                max: NOT_AVAILABLE.to_owned(),
                count: 0,
            },
            |stats| Self {
                average: format!("{:.1}", stats.average),
                min: format!("{:.1}", stats.min),
                max: format!("{:.1}", stats.max),
                count: stats.count,
            },
        )
    }
}
