//! Step definitions for task board drag scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
