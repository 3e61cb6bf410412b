//! Sensor fleet and temperature monitoring.
//!
//! Sensors are identified by a device key that readings refer to. The list
//! page manages sensors and shows each one's latest reading; the monitor
//! page charts one sensor's readings over a time window with summary stats,
//! out-of-range alerts, and a trend.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
