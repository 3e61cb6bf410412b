//! Application services for the sensor pages.

mod fleet;
mod monitor;

pub use fleet::{SensorFleetError, SensorFleetResult, SensorFleetService, SensorRequest};
pub use monitor::{SensorMonitorError, SensorMonitorResult, SensorMonitorService};
