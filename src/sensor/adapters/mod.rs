//! Adapter implementations for sensor storage.

pub mod memory;
pub mod postgres;
