//! Sign-in, sign-up, sign-out, and password recovery flows.

use crate::session::{
    domain::{AuthEvent, AuthenticatedUser, Credentials, NewPassword, SessionDomainError},
    ports::{AuthProvider, AuthProviderError, SignUpOutcome},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;

use super::SessionContext;

/// Service-level errors for session operations.
#[derive(Debug, Error)]
pub enum SessionServiceError {
    /// Input validation failed before contacting the provider.
    #[error(transparent)]
    Domain(#[from] SessionDomainError),
    /// The provider rejected the request.
    #[error(transparent)]
    Provider(#[from] AuthProviderError),
}

/// Result type for session service operations.
pub type SessionServiceResult<T> = Result<T, SessionServiceError>;

/// Orchestrates auth provider calls and keeps a [`SessionContext`] current.
pub struct SessionService<A>
where
    A: AuthProvider,
{
    provider: Arc<A>,
    context: SessionContext,
}

impl<A> Clone for SessionService<A>
where
    A: AuthProvider,
{
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            context: self.context.clone(),
        }
    }
}

impl<A> SessionService<A>
where
    A: AuthProvider,
{
    /// Creates a session service bound to `context`.
    #[must_use]
    pub const fn new(provider: Arc<A>, context: SessionContext) -> Self {
        Self { provider, context }
    }

    /// Returns the context this service maintains.
    #[must_use]
    pub const fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Restores a persisted session into the context on application start.
    ///
    /// # Errors
    ///
    /// Returns [`SessionServiceError::Provider`] when the lookup fails.
    pub async fn restore(&self) -> SessionServiceResult<Option<AuthenticatedUser>> {
        Ok(self.context.init(&*self.provider).await?)
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`SessionServiceError::Domain`] for malformed input and
    /// [`SessionServiceError::Provider`] when the provider rejects the login.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> SessionServiceResult<AuthenticatedUser> {
        let credentials = Credentials::new(email, password)?;
        let session = self.provider.sign_in_with_password(&credentials).await?;
        let user = session.user().clone();
        self.context.apply(&AuthEvent::SignedIn(session));
        tracing::info!(user_id = %user.id(), "signed in");
        Ok(user)
    }

    /// Registers an account, signing in when the provider allows it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionServiceError::Domain`] for malformed input and
    /// [`SessionServiceError::Provider`] when registration fails.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> SessionServiceResult<SignUpOutcome> {
        let credentials = Credentials::new(email, password)?;
        let outcome = self.provider.sign_up(&credentials).await?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.context.apply(&AuthEvent::SignedIn(session.clone()));
        }
        Ok(outcome)
    }

    /// Signs out and tears the context down.
    ///
    /// The local identity is cleared even when the provider call fails.
    ///
    /// # Errors
    ///
    /// Returns [`SessionServiceError::Provider`] when the provider reports a
    /// failure.
    pub async fn logout(&self) -> SessionServiceResult<()> {
        let result = self.provider.sign_out().await;
        self.context.teardown();
        tracing::info!("signed out");
        Ok(result?)
    }

    /// Sends a password recovery email.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::InvalidEmail`] for a malformed address
    /// and provider errors otherwise.
    pub async fn request_password_reset(&self, email: &str) -> SessionServiceResult<()> {
        let trimmed = email.trim();
        if trimmed.is_empty() || !trimmed.contains('@') {
            return Err(SessionDomainError::InvalidEmail(email.to_owned()).into());
        }
        self.provider.request_password_reset(trimmed).await?;
        Ok(())
    }

    /// Replaces the password after recovery.
    ///
    /// # Errors
    ///
    /// Returns [`SessionServiceError::Domain`] when the confirmation differs
    /// or the password is too short, and provider errors otherwise.
    pub async fn update_password(
        &self,
        password: &str,
        confirmation: &str,
    ) -> SessionServiceResult<()> {
        let new_password = NewPassword::new(password, confirmation)?;
        self.provider.update_password(&new_password).await?;
        Ok(())
    }

    /// Subscribes to provider lifecycle events and returns a future that
    /// applies them to the context until the provider closes its channel.
    ///
    /// The subscription is taken before this method returns, so events
    /// published after the call are never missed. A lagging receiver
    /// resynchronises from the provider's current session.
    pub fn listen(&self) -> impl Future<Output = ()> + Send + 'static
    where
        A: 'static,
    {
        let mut events = self.provider.subscribe();
        let service = self.clone();
        async move {
            loop {
                match events.recv().await {
                    Ok(event) => service.context.apply(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "auth events lagged, resynchronising session");
                        if let Err(err) = service.context.init(&*service.provider).await {
                            tracing::error!(error = %err, "session resynchronisation failed");
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}
