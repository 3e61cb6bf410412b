//! Explicit holder of the current identity.

use crate::session::{
    domain::{AuthEvent, AuthenticatedUser, Session, UserId},
    ports::{AuthProvider, AuthProviderResult},
};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Errors raised when an operation needs an identity.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No user is signed in.
    #[error("no authenticated user")]
    Unauthenticated,
}

/// Current-user context shared by every page of one application instance.
///
/// Cloning yields another handle to the same identity. The context starts
/// empty; [`SessionContext::init`] or a [`AuthEvent::SignedIn`] event fill
/// it, and [`SessionContext::teardown`] or [`AuthEvent::SignedOut`] clear it.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the session persisted by the provider.
    ///
    /// Returns the restored user, or `None` when the provider holds no
    /// session.
    ///
    /// # Errors
    ///
    /// Returns the provider error when the session lookup fails; the context
    /// is left empty in that case.
    pub async fn init<A>(&self, provider: &A) -> AuthProviderResult<Option<AuthenticatedUser>>
    where
        A: AuthProvider + ?Sized,
    {
        let restored = provider.current_session().await;
        let session = match restored {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "session restore failed");
                self.teardown();
                return Err(err);
            }
        };
        let user = session.as_ref().map(|value| value.user().clone());
        *self.write() = session;
        tracing::debug!(authenticated = user.is_some(), "session context initialised");
        Ok(user)
    }

    /// Applies a provider lifecycle event.
    pub fn apply(&self, event: &AuthEvent) {
        match event {
            AuthEvent::SignedIn(session) | AuthEvent::TokenRefreshed(session) => {
                *self.write() = Some(session.clone());
            }
            AuthEvent::SignedOut => self.teardown(),
        }
    }

    /// Clears the current identity.
    pub fn teardown(&self) {
        *self.write() = None;
    }

    /// Returns the signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        self.read().as_ref().map(|session| session.user().clone())
    }

    /// Returns the current session, if any.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.read().clone()
    }

    /// Returns `true` when a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Returns the identity that scopes owned reads and writes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unauthenticated`] when nobody is signed in.
    pub fn require_user(&self) -> Result<UserId, SessionError> {
        self.read()
            .as_ref()
            .map(|session| session.user().id())
            .ok_or(SessionError::Unauthenticated)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}
