//! Domain model for sensors and temperature readings.

mod alert;
mod error;
mod ids;
mod reading;
mod sensor;
mod stats;
mod summary;
mod window;

pub use alert::{AlertKind, AlertPolicy, TemperatureAlert};
pub use error::{ParseSensorStatusError, ParseTimeRangeError, SensorDomainError};
pub use ids::{SensorId, SensorKey};
pub use reading::{TemperatureReading, Trend};
pub use sensor::{PersistedSensorData, Sensor, SensorDraft, SensorStatus};
pub use stats::{NOT_AVAILABLE, StatsDisplay, TemperatureStats};
pub use summary::SensorSummary;
pub use window::TimeRange;
