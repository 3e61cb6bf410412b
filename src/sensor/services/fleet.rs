//! Service behind the sensor list page.

use crate::optimistic::{LocalCollection, MutationController, MutationLabels, Notifier};
use crate::sensor::{
    domain::{
        Sensor, SensorDomainError, SensorDraft, SensorId, SensorKey, SensorStatus, SensorSummary,
    },
    ports::{ReadingRepository, SensorRepository, SensorRepositoryError},
};
use crate::session::domain::UserId;
use crate::session::services::{SessionContext, SessionError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const LOAD_FAILED: &str = "Erro ao buscar sensores";
const SAVE_FAILED: &str = "Erro ao salvar sensor";
const DELETE_FAILED: &str = "Erro ao excluir sensor";
const SUCCESS: &str = "Sucesso";

/// Request payload for registering or editing a sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorRequest {
    key: String,
    name: String,
    description: Option<String>,
    status: SensorStatus,
}

impl SensorRequest {
    /// Creates a request with the device key and name.
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: None,
            status: SensorStatus::default(),
        }
    }

    /// Creates a request with a freshly generated device key.
    #[must_use]
    pub fn with_generated_key(name: impl Into<String>) -> Self {
        Self::new(SensorKey::generate().as_str(), name)
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: SensorStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the requested key text.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn into_draft(self) -> Result<SensorDraft, SensorDomainError> {
        let mut draft = SensorDraft::new(self.key, self.name)?.with_status(self.status);
        if let Some(description) = self.description {
            draft = draft.with_description(description);
        }
        Ok(draft)
    }
}

/// Service-level errors for the sensor list.
#[derive(Debug, Error)]
pub enum SensorFleetError {
    /// Nobody is signed in.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Input validation failed, including attempts to change a key.
    #[error(transparent)]
    Domain(#[from] SensorDomainError),
    /// Storage rejected the operation.
    #[error(transparent)]
    Repository(#[from] SensorRepositoryError),
    /// The sensor is not in the list.
    #[error("sensor not found: {0}")]
    NotFound(SensorId),
}

/// Result type for sensor list operations.
pub type SensorFleetResult<T> = Result<T, SensorFleetError>;

/// Sensor list with the latest reading of each sensor.
pub struct SensorFleetService<S, R, N, C>
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
    cache: LocalCollection<SensorSummary>,
}

impl<S, R, N, C> SensorFleetService<S, R, N, C>
where
    S: SensorRepository,
    R: ReadingRepository,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates the service; call [`Self::open`] to load the list.
    #[must_use]
    pub fn new(
        sensors: Arc<S>,
        readings: Arc<R>,
        session: SessionContext,
        controller: MutationController<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            sensors,
            readings,
            session,
            controller,
            clock,
            cache: LocalCollection::default(),
        }
    }

    /// Loads the signed-in user's sensors, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SensorFleetError`] when nobody is signed in or a read fails;
    /// the failure is also reported through the notifier.
    pub async fn open(&self) -> SensorFleetResult<Vec<SensorSummary>> {
        let owner = self.require_user(LOAD_FAILED)?;
        let ticket = self.cache.begin_reload();
        match self.load(owner).await {
            Ok(summaries) => {
                debug!(sensors = summaries.len(), "sensor list loaded");
                self.cache.finish_reload(ticket, summaries.clone());
                Ok(summaries)
            }
            Err(err) => {
                self.cache.abandon_reload(ticket);
                self.controller.reject(LOAD_FAILED, &err);
                Err(err)
            }
        }
    }

    async fn load(&self, owner: UserId) -> SensorFleetResult<Vec<SensorSummary>> {
        let sensors = self.sensors.list_for_owner(owner).await?;
        let keys: Vec<SensorKey> = sensors.iter().map(|sensor| sensor.key().clone()).collect();
        let mut latest = self.readings.latest_for_sensors(owner, &keys).await?;
        Ok(sensors
            .into_iter()
            .map(|sensor| {
                let reading = latest
                    .iter()
                    .position(|reading| reading.sensor_key() == sensor.key())
                    .map(|index| latest.swap_remove(index));
                SensorSummary::new(sensor, reading)
            })
            .collect())
    }

    /// Returns the cached list.
    #[must_use]
    pub fn sensors(&self) -> Vec<SensorSummary> {
        self.cache.snapshot()
    }

    /// Returns cached sensors whose name, key or description contains
    /// `term`, ignoring case.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<SensorSummary> {
        self.cache.with_items(|summaries| {
            summaries
                .iter()
                .filter(|summary| summary.sensor().matches(term))
                .cloned()
                .collect()
        })
    }

    /// Returns the collection backing the list.
    #[must_use]
    pub const fn cache(&self) -> &LocalCollection<SensorSummary> {
        &self.cache
    }

    /// Registers a sensor, or edits `editing` when given.
    ///
    /// # Errors
    ///
    /// See [`Self::create`] and [`Self::edit`].
    pub async fn save(
        &self,
        editing: Option<SensorId>,
        request: SensorRequest,
    ) -> SensorFleetResult<Sensor> {
        match editing {
            Some(id) => self.edit(id, request).await,
            None => self.create(request).await,
        }
    }

    /// Registers a sensor and puts it at the top of the list.
    ///
    /// # Errors
    ///
    /// Returns [`SensorFleetError::Domain`] without any write for invalid
    /// input, or [`SensorFleetError::Repository`] when the store rejected
    /// the insert, for example because the key is taken.
    pub async fn create(&self, request: SensorRequest) -> SensorFleetResult<Sensor> {
        let owner = self.require_user(SAVE_FAILED)?;
        let draft = self.validate(request)?;
        let sensor = Sensor::create(owner, draft, &*self.clock);

        let summary = SensorSummary::new(sensor.clone(), None);
        self.controller
            .run(
                &self.cache,
                MutationLabels::new(SUCCESS, SAVE_FAILED).with_success_detail("Sensor cadastrado!"),
                move |summaries| summaries.insert(0, summary),
                self.sensors.insert(&sensor),
                || self.load(owner),
            )
            .await
            .into_result()?;
        Ok(sensor)
    }

    /// Replaces name, description and status of a listed sensor.
    ///
    /// # Errors
    ///
    /// Returns [`SensorFleetError::Domain`] for invalid input or a changed
    /// key, [`SensorFleetError::NotFound`] when the sensor is not listed, or
    /// [`SensorFleetError::Repository`] when the store rejected the update.
    pub async fn edit(&self, id: SensorId, request: SensorRequest) -> SensorFleetResult<Sensor> {
        let owner = self.require_user(SAVE_FAILED)?;
        let draft = self.validate(request)?;
        let Some(mut sensor) = self.cached(owner, id) else {
            let err = SensorFleetError::NotFound(id);
            self.controller.reject(SAVE_FAILED, &err);
            return Err(err);
        };
        if let Err(err) = sensor.apply(draft, &*self.clock) {
            self.controller.reject(SAVE_FAILED, &err);
            return Err(err.into());
        }

        let edited = sensor.clone();
        self.controller
            .run(
                &self.cache,
                MutationLabels::new(SUCCESS, SAVE_FAILED)
                    .with_success_detail("Sensor atualizado!"),
                move |summaries| {
                    if let Some(summary) = summaries
                        .iter_mut()
                        .find(|summary| summary.sensor().id() == id)
                    {
                        summary.replace_sensor(edited);
                    }
                },
                self.sensors.update(owner, &sensor),
                || self.load(owner),
            )
            .await
            .into_result()?;
        Ok(sensor)
    }

    /// Deletes a listed sensor together with its readings.
    ///
    /// Readings are removed first so no orphaned rows remain if the sensor
    /// delete succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`SensorFleetError::NotFound`] when the sensor is not listed,
    /// or [`SensorFleetError::Repository`] when either delete failed; the
    /// list has then been reloaded.
    pub async fn delete(&self, id: SensorId) -> SensorFleetResult<()> {
        let owner = self.require_user(DELETE_FAILED)?;
        let Some(sensor) = self.cached(owner, id) else {
            let err = SensorFleetError::NotFound(id);
            self.controller.reject(DELETE_FAILED, &err);
            return Err(err);
        };
        let key = sensor.key().clone();
        let remote = async move {
            let removed = self.readings.delete_for_sensor(owner, &key).await?;
            debug!(sensor = %key, readings = removed, "sensor readings deleted");
            self.sensors.delete(owner, id).await
        };
        self.controller
            .run(
                &self.cache,
                MutationLabels::new(SUCCESS, DELETE_FAILED)
                    .with_success_detail("Sensor excluído."),
                |summaries| summaries.retain(|summary| summary.sensor().id() != id),
                remote,
                || self.load(owner),
            )
            .await
            .into_result()?;
        Ok(())
    }

    /// Refetches the list from the store.
    ///
    /// Returns whether the fetched rows replaced the cache.
    ///
    /// # Errors
    ///
    /// Returns [`SensorFleetError::Session`] when nobody is signed in.
    pub async fn reload(&self) -> SensorFleetResult<bool> {
        let owner = self.session.require_user()?;
        Ok(self
            .controller
            .reconcile(&self.cache, || self.load(owner))
            .await)
    }

    /// Detaches the page; in-flight results arriving later are ignored.
    pub fn unmount(&self) {
        self.cache.detach();
    }

    fn cached(&self, owner: UserId, id: SensorId) -> Option<Sensor> {
        self.cache.with_items(|summaries| {
            summaries
                .iter()
                .find(|summary| summary.sensor().id() == id && summary.sensor().owner() == owner)
                .map(|summary| summary.sensor().clone())
        })
    }

    fn require_user(&self, failure_title: &str) -> SensorFleetResult<UserId> {
        self.session.require_user().map_err(|err| {
            self.controller.reject(failure_title, &err);
            SensorFleetError::from(err)
        })
    }

    fn validate(&self, request: SensorRequest) -> SensorFleetResult<SensorDraft> {
        request.into_draft().map_err(|err| {
            self.controller.reject(SAVE_FAILED, &err);
            SensorFleetError::from(err)
        })
    }
}
