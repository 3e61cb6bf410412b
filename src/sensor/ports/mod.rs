//! Port contracts for sensor and reading storage.

mod repository;

pub use repository::{
    ReadingRepository, SensorRepository, SensorRepositoryError, SensorRepositoryResult,
};
