//! Taskpulse: project task boards and IoT temperature monitoring.
//!
//! This crate provides the core of a dashboard where a signed-in user
//! manages projects, moves tasks between status columns, and watches
//! temperature sensors.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and identity
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: One service per page, mutating through the optimistic
//!   controller
//!
//! # Modules
//!
//! - [`task`]: Status board, drag reassignment, and task edits
//! - [`project`]: Project catalog with derived progress
//! - [`sensor`]: Sensors, readings, windows, stats, and alerts
//! - [`optimistic`]: Apply-locally, write-remotely, reload-on-failure
//! - [`session`]: Authenticated identity scoping every owned read and write
//! - [`config`], [`logging`], [`store`]: Ambient configuration, tracing, and
//!   the database pool

pub mod config;
pub mod logging;
pub mod navigation;
pub mod optimistic;
pub mod project;
pub mod sensor;
pub mod session;
pub mod store;
pub mod task;

#[cfg(test)]
mod test_support;
