//! Shared world state for sensor monitoring scenarios.

use std::sync::Arc;

use chrono::Duration;
use mockable::{Clock, DefaultClock};
use rstest::fixture;
use taskpulse::optimistic::{MutationController, RecordingNotifier};
use taskpulse::sensor::{
    adapters::memory::{InMemoryReadingRepository, InMemorySensorRepository},
    domain::{AlertPolicy, Sensor},
    services::SensorMonitorService,
};
use taskpulse::session::{
    domain::{AuthEvent, AuthenticatedUser, Session, UserId},
    services::SessionContext,
};

/// Monitor service type used by the BDD world.
pub type TestMonitorService = SensorMonitorService<
    InMemorySensorRepository,
    InMemoryReadingRepository,
    RecordingNotifier,
    DefaultClock,
>;

/// Scenario world for sensor monitoring tests.
pub struct MonitorWorld {
    pub owner: UserId,
    pub session: SessionContext,
    pub sensors: Arc<InMemorySensorRepository>,
    pub readings: Arc<InMemoryReadingRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub sensor: Option<Sensor>,
    pub service: Option<TestMonitorService>,
}

impl MonitorWorld {
    /// Creates a world with a signed-in user and empty stores.
    #[must_use]
    pub fn new() -> Self {
        let owner = UserId::new();
        let session = SessionContext::new();
        let user = AuthenticatedUser::new(owner, "ana@example.com");
        let expires_at = DefaultClock.utc() + Duration::hours(1);
        session.apply(&AuthEvent::SignedIn(Session::new(user, "token", expires_at)));
        Self {
            owner,
            session,
            sensors: Arc::new(InMemorySensorRepository::new()),
            readings: Arc::new(InMemoryReadingRepository::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            sensor: None,
            service: None,
        }
    }

    /// Returns the sensor registered by the scenario.
    pub fn sensor(&self) -> Result<&Sensor, eyre::Report> {
        self.sensor
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no sensor registered in this scenario"))
    }

    /// Returns the opened monitor page.
    pub fn service(&self) -> Result<&TestMonitorService, eyre::Report> {
        self.service
            .as_ref()
            .ok_or_else(|| eyre::eyre!("monitor page has not been opened"))
    }

    /// Builds the monitor page for the registered sensor.
    pub fn mount(&mut self) -> Result<&TestMonitorService, eyre::Report> {
        let sensor_id = self.sensor()?.id();
        let service = SensorMonitorService::new(
            Arc::clone(&self.sensors),
            Arc::clone(&self.readings),
            self.session.clone(),
            MutationController::new(Arc::clone(&self.notifier)),
            Arc::new(DefaultClock),
            sensor_id,
            AlertPolicy::default(),
        );
        Ok(self.service.insert(service))
    }
}

impl Default for MonitorWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MonitorWorld {
    MonitorWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a temperature written in a step.
pub fn parse_temperature(raw: &str) -> Result<f64, eyre::Report> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| eyre::eyre!("invalid temperature {raw:?}: {err}"))
}
