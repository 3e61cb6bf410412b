//! In-memory sensor and reading storage.

mod reading;
mod sensor;

pub use reading::InMemoryReadingRepository;
pub use sensor::InMemorySensorRepository;

use crate::sensor::ports::SensorRepositoryError;
use std::fmt;

fn poisoned(err: &impl fmt::Display) -> SensorRepositoryError {
    SensorRepositoryError::persistence(std::io::Error::other(err.to_string()))
}
