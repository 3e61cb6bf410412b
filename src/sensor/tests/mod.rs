//! Unit tests for the sensor context.
