//! In-memory sensor repository.

use super::poisoned;
use crate::sensor::{
    domain::{Sensor, SensorId},
    ports::{SensorRepository, SensorRepositoryError, SensorRepositoryResult},
};
use crate::session::domain::UserId;
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory sensor repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySensorRepository {
    state: Arc<RwLock<HashMap<SensorId, Sensor>>>,
}

impl InMemorySensorRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SensorRepository for InMemorySensorRepository {
    async fn list_for_owner(&self, owner: UserId) -> SensorRepositoryResult<Vec<Sensor>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        let mut sensors: Vec<Sensor> = state
            .values()
            .filter(|sensor| sensor.owner() == owner)
            .cloned()
            .collect();
        sensors.sort_by_key(|sensor| Reverse(sensor.created_at()));
        Ok(sensors)
    }

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: SensorId,
    ) -> SensorRepositoryResult<Option<Sensor>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.get(&id).filter(|sensor| sensor.owner() == owner).cloned())
    }

    async fn insert(&self, sensor: &Sensor) -> SensorRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        if state.contains_key(&sensor.id()) {
            return Err(SensorRepositoryError::DuplicateSensor(sensor.id()));
        }
        if state
            .values()
            .any(|stored| stored.owner() == sensor.owner() && stored.key() == sensor.key())
        {
            return Err(SensorRepositoryError::DuplicateKey(sensor.key().clone()));
        }
        state.insert(sensor.id(), sensor.clone());
        Ok(())
    }

    async fn update(&self, owner: UserId, sensor: &Sensor) -> SensorRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let stored = state
            .get_mut(&sensor.id())
            .filter(|stored| stored.owner() == owner && sensor.owner() == owner)
            .ok_or(SensorRepositoryError::NotFound(sensor.id()))?;
        *stored = sensor.clone();
        Ok(())
    }

    async fn delete(&self, owner: UserId, id: SensorId) -> SensorRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        match state.get(&id) {
            Some(sensor) if sensor.owner() == owner => {
                state.remove(&id);
                Ok(())
            }
            _ => Err(SensorRepositoryError::NotFound(id)),
        }
    }
}
