//! Repository ports for owner-scoped sensors and their readings.

use crate::sensor::domain::{Sensor, SensorId, SensorKey, TemperatureReading};
use crate::session::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for sensor and reading repository operations.
pub type SensorRepositoryResult<T> = Result<T, SensorRepositoryError>;

/// Sensor persistence contract.
#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Returns the owner's sensors, newest first.
    async fn list_for_owner(&self, owner: UserId) -> SensorRepositoryResult<Vec<Sensor>>;

    /// Finds one of the owner's sensors.
    async fn find_for_owner(
        &self,
        owner: UserId,
        id: SensorId,
    ) -> SensorRepositoryResult<Option<Sensor>>;

    /// Stores a new sensor.
    ///
    /// # Errors
    ///
    /// Returns [`SensorRepositoryError::DuplicateSensor`] when the identifier
    /// is taken, or [`SensorRepositoryError::DuplicateKey`] when the owner
    /// already has a sensor with the same key.
    async fn insert(&self, sensor: &Sensor) -> SensorRepositoryResult<()>;

    /// Persists name, description, status and `updated_at` of one of the
    /// owner's sensors, matched by `owner` rather than by `sensor.owner()`.
    ///
    /// # Errors
    ///
    /// Returns [`SensorRepositoryError::NotFound`] when the owner has no such
    /// sensor.
    async fn update(&self, owner: UserId, sensor: &Sensor) -> SensorRepositoryResult<()>;

    /// Deletes one of the owner's sensors.
    ///
    /// # Errors
    ///
    /// Returns [`SensorRepositoryError::NotFound`] when the owner has no such
    /// sensor.
    async fn delete(&self, owner: UserId, id: SensorId) -> SensorRepositoryResult<()>;
}

/// Temperature reading persistence contract.
///
/// Readings are keyed by the sensor's device key, not its record id.
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Returns every reading of one sensor, oldest first.
    async fn list_for_sensor(
        &self,
        owner: UserId,
        key: &SensorKey,
    ) -> SensorRepositoryResult<Vec<TemperatureReading>>;

    /// Returns the newest reading of each listed sensor that has any.
    async fn latest_for_sensors(
        &self,
        owner: UserId,
        keys: &[SensorKey],
    ) -> SensorRepositoryResult<Vec<TemperatureReading>>;

    /// Stores a reading.
    async fn insert(&self, reading: &TemperatureReading) -> SensorRepositoryResult<()>;

    /// Deletes every reading of one sensor and returns how many were removed.
    async fn delete_for_sensor(
        &self,
        owner: UserId,
        key: &SensorKey,
    ) -> SensorRepositoryResult<usize>;
}

/// Errors returned by sensor and reading repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SensorRepositoryError {
    /// A sensor with the same identifier already exists.
    #[error("duplicate sensor identifier: {0}")]
    DuplicateSensor(SensorId),

    /// The owner already has a sensor with this key.
    #[error("duplicate sensor key: {0}")]
    DuplicateKey(SensorKey),

    /// The sensor was not found for this owner.
    #[error("sensor not found: {0}")]
    NotFound(SensorId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SensorRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
