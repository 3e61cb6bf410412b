//! Service behind one mounted sensor monitor page.

use crate::navigation::{Redirect, Route};
use crate::optimistic::{LocalCollection, MutationController, MutationLabels, Notifier};
use crate::sensor::{
    domain::{
        AlertPolicy, Sensor, SensorDomainError, SensorId, StatsDisplay, TemperatureAlert,
        TemperatureReading, TemperatureStats, TimeRange, Trend,
    },
    ports::{ReadingRepository, SensorRepository, SensorRepositoryError, SensorRepositoryResult},
};
use crate::session::domain::UserId;
use crate::session::services::{SessionContext, SessionError};
use mockable::Clock;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

const LOAD_FAILED: &str = "Erro ao buscar detalhes do sensor";
const RECORD_FAILED: &str = "Erro ao adicionar temperatura";

/// Service-level errors for the sensor monitor.
#[derive(Debug, Error)]
pub enum SensorMonitorError {
    /// Nobody is signed in.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The temperature is not a finite number.
    #[error(transparent)]
    Domain(#[from] SensorDomainError),
    /// Storage rejected the operation.
    #[error(transparent)]
    Repository(#[from] SensorRepositoryError),
    /// The sensor does not exist for the signed-in user, or the page has
    /// not been opened.
    #[error("sensor not found: {0}")]
    SensorNotFound(SensorId),
}

/// Result type for sensor monitor operations.
pub type SensorMonitorResult<T> = Result<T, SensorMonitorError>;

/// Readings, stats, and alerts for one sensor.
pub struct SensorMonitorService<S, R, N, C>
where
    S: SensorRepository,
    R: ReadingRepository,
    N: Notifier,
    C: Clock + Send + Sync,
{
    sensors: Arc<S>,
    readings: Arc<R>,
    session: SessionContext,
    controller: MutationController<N>,
    clock: Arc<C>,
    sensor_id: SensorId,
    policy: AlertPolicy,
    sensor: RwLock<Option<Sensor>>,
    range: RwLock<TimeRange>,
    cache: LocalCollection<TemperatureReading>,
}

impl<S, R, N, C> SensorMonitorService<S, R, N, C>
where
    S: SensorRepository,
    R: ReadingRepository,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates the page for `sensor_id`; call [`Self::open`] to load it.
    #[must_use]
    pub fn new(
        sensors: Arc<S>,
        readings: Arc<R>,
        session: SessionContext,
        controller: MutationController<N>,
        clock: Arc<C>,
        sensor_id: SensorId,
        policy: AlertPolicy,
    ) -> Self {
        Self {
            sensors,
            readings,
            session,
            controller,
            clock,
            sensor_id,
            policy,
            sensor: RwLock::new(None),
            range: RwLock::new(TimeRange::default()),
            cache: LocalCollection::default(),
        }
    }

    /// Loads the sensor and its readings, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a [`Redirect`] to the sign-in page when nobody is signed in,
    /// or to the sensor list when the sensor cannot be loaded.
    pub async fn open(&self) -> Result<Sensor, Redirect> {
        let owner = self.session.require_user().map_err(|err| {
            self.controller.reject(LOAD_FAILED, &err);
            Redirect::new(Route::Login, err.to_string())
        })?;

        let ticket = self.cache.begin_reload();
        match self.load(owner).await {
            Ok((sensor, readings)) => {
                debug!(sensor = %sensor.key(), readings = readings.len(), "sensor monitor loaded");
                *self.sensor.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(sensor.clone());
                self.cache.finish_reload(ticket, readings);
                Ok(sensor)
            }
            Err(err) => {
                self.cache.abandon_reload(ticket);
                warn!(sensor = %self.sensor_id, error = %err, "sensor monitor failed to load");
                self.controller.reject(LOAD_FAILED, &err);
                Err(Redirect::new(Route::Sensors, err.to_string()))
            }
        }
    }

    async fn load(
        &self,
        owner: UserId,
    ) -> SensorMonitorResult<(Sensor, Vec<TemperatureReading>)> {
        let sensor = self
            .sensors
            .find_for_owner(owner, self.sensor_id)
            .await?
            .ok_or(SensorMonitorError::SensorNotFound(self.sensor_id))?;
        let readings = self.readings.list_for_sensor(owner, sensor.key()).await?;
        Ok((sensor, readings))
    }

    async fn load_readings(
        &self,
        owner: UserId,
        sensor: &Sensor,
    ) -> SensorRepositoryResult<Vec<TemperatureReading>> {
        self.readings.list_for_sensor(owner, sensor.key()).await
    }

    /// Returns the loaded sensor.
    #[must_use]
    pub fn sensor(&self) -> Option<Sensor> {
        self.sensor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Selects the period of readings shown.
    pub fn set_time_range(&self, range: TimeRange) {
        *self.range.write().unwrap_or_else(PoisonError::into_inner) = range;
    }

    /// Returns the selected period.
    #[must_use]
    pub fn time_range(&self) -> TimeRange {
        *self.range.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns every cached reading, oldest first.
    #[must_use]
    pub fn readings(&self) -> Vec<TemperatureReading> {
        self.cache.snapshot()
    }

    /// Returns the readings inside the selected period, oldest first.
    #[must_use]
    pub fn visible_readings(&self) -> Vec<TemperatureReading> {
        let range = self.time_range();
        let now = self.clock.utc();
        self.cache.with_items(|readings| range.filter(readings, now))
    }

    /// Summarises the visible readings.
    #[must_use]
    pub fn stats(&self) -> Option<TemperatureStats> {
        TemperatureStats::from_readings(&self.visible_readings())
    }

    /// Formats [`Self::stats`] for the stats cards.
    #[must_use]
    pub fn stats_display(&self) -> StatsDisplay {
        StatsDisplay::from(self.stats())
    }

    /// Returns alerts for the most recent out-of-range readings of the
    /// whole history, regardless of the selected period.
    #[must_use]
    pub fn alerts(&self) -> Vec<TemperatureAlert> {
        self.cache.with_items(|readings| self.policy.alerts(readings))
    }

    /// Returns the direction of the two latest readings.
    #[must_use]
    pub fn trend(&self) -> Trend {
        self.cache.with_items(Trend::of)
    }

    /// Returns the collection backing the page.
    #[must_use]
    pub const fn cache(&self) -> &LocalCollection<TemperatureReading> {
        &self.cache
    }

    /// Records a manual reading taken now and appends it to the history.
    ///
    /// # Errors
    ///
    /// Returns [`SensorMonitorError::Domain`] for a non-finite temperature,
    /// [`SensorMonitorError::SensorNotFound`] before [`Self::open`]
    /// succeeded, or [`SensorMonitorError::Repository`] when the store
    /// rejected the insert; the history has then been reloaded.
    pub async fn record_reading(
        &self,
        temperature: f64,
    ) -> SensorMonitorResult<TemperatureReading> {
        let owner = self.session.require_user().map_err(|err| {
            self.controller.reject(RECORD_FAILED, &err);
            SensorMonitorError::from(err)
        })?;
        let Some(sensor) = self.sensor() else {
            let err = SensorMonitorError::SensorNotFound(self.sensor_id);
            self.controller.reject(RECORD_FAILED, &err);
            return Err(err);
        };
        let now = self.clock.utc();
        let reading = TemperatureReading::new(owner, sensor.key().clone(), temperature, now)
            .map_err(|err| {
                self.controller.reject(RECORD_FAILED, &err);
                SensorMonitorError::from(err)
            })?;

        let appended = reading.clone();
        self.controller
            .run(
                &self.cache,
                MutationLabels::new("Sucesso", RECORD_FAILED)
                    .with_success_detail("Temperatura adicionada com sucesso!"),
                move |readings| readings.push(appended),
                self.readings.insert(&reading),
                || self.load_readings(owner, &sensor),
            )
            .await
            .into_result()?;
        Ok(reading)
    }

    /// Refetches the history from the store.
    ///
    /// # Errors
    ///
    /// Returns [`SensorMonitorError::Session`] when nobody is signed in, or
    /// [`SensorMonitorError::SensorNotFound`] before [`Self::open`]
    /// succeeded.
    pub async fn reload(&self) -> SensorMonitorResult<bool> {
        let owner = self.session.require_user()?;
        let sensor = self
            .sensor()
            .ok_or(SensorMonitorError::SensorNotFound(self.sensor_id))?;
        Ok(self
            .controller
            .reconcile(&self.cache, || self.load_readings(owner, &sensor))
            .await)
    }

    /// Detaches the page; in-flight results arriving later are ignored.
    pub fn unmount(&self) {
        self.cache.detach();
    }
}
