//! Adapter implementations for the auth provider port.

pub mod memory;
