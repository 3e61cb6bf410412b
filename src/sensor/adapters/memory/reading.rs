//! In-memory reading repository.

use super::poisoned;
use crate::sensor::{
    domain::{SensorKey, TemperatureReading},
    ports::{ReadingRepository, SensorRepositoryResult},
};
use crate::session::domain::UserId;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory reading repository, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReadingRepository {
    state: Arc<RwLock<Vec<TemperatureReading>>>,
}

impl InMemoryReadingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingRepository for InMemoryReadingRepository {
    async fn list_for_sensor(
        &self,
        owner: UserId,
        key: &SensorKey,
    ) -> SensorRepositoryResult<Vec<TemperatureReading>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        let mut readings: Vec<TemperatureReading> = state
            .iter()
            .filter(|reading| reading.owner() == owner && reading.sensor_key() == key)
            .cloned()
            .collect();
        readings.sort_by_key(TemperatureReading::timestamp);
        Ok(readings)
    }

    async fn latest_for_sensors(
        &self,
        owner: UserId,
        keys: &[SensorKey],
    ) -> SensorRepositoryResult<Vec<TemperatureReading>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(keys
            .iter()
            .filter_map(|key| {
                state
                    .iter()
                    .filter(|reading| reading.owner() == owner && reading.sensor_key() == key)
                    .max_by_key(|reading| reading.timestamp())
                    .cloned()
            })
            .collect())
    }

    async fn insert(&self, reading: &TemperatureReading) -> SensorRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state.push(reading.clone());
        Ok(())
    }

    async fn delete_for_sensor(
        &self,
        owner: UserId,
        key: &SensorKey,
    ) -> SensorRepositoryResult<usize> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let before = state.len();
        state.retain(|reading| !(reading.owner() == owner && reading.sensor_key() == key));
        Ok(before - state.len())
    }
}
