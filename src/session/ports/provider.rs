//! Auth provider port: identity lookup, sign-in flows, lifecycle events.

use crate::session::domain::{AuthEvent, Credentials, NewPassword, Session};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

/// Result type for auth provider operations.
pub type AuthProviderResult<T> = Result<T, AuthProviderError>;

/// Result of a sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account is active and a session was issued.
    SignedIn(Session),
    /// The provider sent a confirmation email; no session yet.
    ConfirmationRequired,
}

/// Hosted authentication contract.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the persisted session, if the provider still holds one.
    async fn current_session(&self) -> AuthProviderResult<Option<Session>>;

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::InvalidCredentials`] when the account
    /// does not exist or the password is wrong.
    async fn sign_in_with_password(&self, credentials: &Credentials)
    -> AuthProviderResult<Session>;

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::AccountExists`] when the email is taken.
    async fn sign_up(&self, credentials: &Credentials) -> AuthProviderResult<SignUpOutcome>;

    /// Ends the current session.
    async fn sign_out(&self) -> AuthProviderResult<()>;

    /// Sends a password recovery email.
    async fn request_password_reset(&self, email: &str) -> AuthProviderResult<()>;

    /// Replaces the password of the signed-in (or recovering) user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::NoSession`] when no user is signed in.
    async fn update_password(&self, password: &NewPassword) -> AuthProviderResult<()>;

    /// Subscribes to session lifecycle events.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Errors returned by auth provider implementations.
#[derive(Debug, Clone, Error)]
pub enum AuthProviderError {
    /// Email or password is wrong.
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already registered: {0}")]
    AccountExists(String),

    /// The operation needs a signed-in user.
    #[error("auth session missing")]
    NoSession,

    /// Transport or provider-side failure.
    #[error("auth provider error: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuthProviderError {
    /// Wraps a provider-side error.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(err))
    }
}
