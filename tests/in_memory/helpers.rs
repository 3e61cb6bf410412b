//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskpulse::optimistic::{MutationController, RecordingNotifier};
use taskpulse::project::adapters::memory::InMemoryProjectRepository;
use taskpulse::sensor::adapters::memory::{InMemoryReadingRepository, InMemorySensorRepository};
use taskpulse::session::{
    adapters::memory::InMemoryAuthProvider,
    domain::Credentials,
    services::{SessionContext, SessionService},
};
use taskpulse::task::adapters::memory::InMemoryTaskRepository;

/// Email registered by [`Stores::sign_in`].
pub const EMAIL: &str = "ana@example.com";
/// Password shared by every registered account.
pub const PASSWORD: &str = "segredo123";

/// Stores and collaborators shared by every page of one application.
pub struct Stores {
    pub clock: Arc<DefaultClock>,
    pub auth: Arc<InMemoryAuthProvider<DefaultClock>>,
    pub session: SessionContext,
    pub notifier: Arc<RecordingNotifier>,
    pub projects: Arc<InMemoryProjectRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub sensors: Arc<InMemorySensorRepository>,
    pub readings: Arc<InMemoryReadingRepository>,
}

impl Stores {
    /// Returns a controller reporting to the shared notifier.
    pub fn controller(&self) -> MutationController<RecordingNotifier> {
        MutationController::new(Arc::clone(&self.notifier))
    }

    /// Returns a session service over the shared context.
    pub fn sessions(&self) -> SessionService<InMemoryAuthProvider<DefaultClock>> {
        SessionService::new(Arc::clone(&self.auth), self.session.clone())
    }

    /// Registers `email` and signs it in.
    ///
    /// # Errors
    ///
    /// Returns an error if registration or sign-in fails.
    pub async fn sign_in_as(&self, email: &str) -> Result<(), eyre::Report> {
        self.auth.register(&Credentials::new(email, PASSWORD)?)?;
        self.sessions().login(email, PASSWORD).await?;
        Ok(())
    }

    /// Registers the default account and signs it in.
    ///
    /// # Errors
    ///
    /// Returns an error if registration or sign-in fails.
    pub async fn sign_in(&self) -> Result<(), eyre::Report> {
        self.sign_in_as(EMAIL).await
    }
}

/// Provides fresh stores with nobody signed in.
#[fixture]
pub fn stores() -> Stores {
    let clock = Arc::new(DefaultClock);
    Stores {
        auth: Arc::new(InMemoryAuthProvider::new(Arc::clone(&clock))),
        clock,
        session: SessionContext::new(),
        notifier: Arc::new(RecordingNotifier::new()),
        projects: Arc::new(InMemoryProjectRepository::new()),
        tasks: Arc::new(InMemoryTaskRepository::new()),
        sensors: Arc::new(InMemorySensorRepository::new()),
        readings: Arc::new(InMemoryReadingRepository::new()),
    }
}
