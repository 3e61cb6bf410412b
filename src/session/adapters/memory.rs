//! In-memory auth provider for tests and local runs.

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::session::{
    domain::{AuthEvent, AuthenticatedUser, Credentials, NewPassword, Session, UserId},
    ports::{AuthProvider, AuthProviderError, AuthProviderResult, SignUpOutcome},
};

const EVENT_CAPACITY: usize = 16;
const TOKEN_LIFETIME_HOURS: i64 = 1;

/// Thread-safe in-memory auth provider.
///
/// Accounts are confirmed immediately unless the provider was built with
/// [`InMemoryAuthProvider::requiring_confirmation`].
pub struct InMemoryAuthProvider<C: Clock + Send + Sync> {
    state: Arc<RwLock<ProviderState>>,
    events: broadcast::Sender<AuthEvent>,
    clock: Arc<C>,
    require_confirmation: bool,
}

impl<C: Clock + Send + Sync> Clone for InMemoryAuthProvider<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            events: self.events.clone(),
            clock: Arc::clone(&self.clock),
            require_confirmation: self.require_confirmation,
        }
    }
}

#[derive(Debug, Default)]
struct ProviderState {
    accounts: HashMap<String, Account>,
    current: Option<Session>,
    reset_requests: Vec<String>,
}

#[derive(Debug, Clone)]
struct Account {
    user: AuthenticatedUser,
    password: String,
}

impl<C: Clock + Send + Sync> InMemoryAuthProvider<C> {
    /// Creates a provider with no accounts.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(ProviderState::default())),
            events,
            clock,
            require_confirmation: false,
        }
    }

    /// Creates a provider whose sign-ups wait for email confirmation.
    #[must_use]
    pub fn requiring_confirmation(clock: Arc<C>) -> Self {
        Self {
            require_confirmation: true,
            ..Self::new(clock)
        }
    }

    /// Registers a confirmed account and returns its identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::AccountExists`] when the email is taken.
    pub fn register(&self, credentials: &Credentials) -> AuthProviderResult<AuthenticatedUser> {
        let mut state = self.write()?;
        insert_account(&mut state, credentials)
    }

    /// Returns the emails that requested a password reset, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::Provider`] when the state lock is poisoned.
    pub fn reset_requests(&self) -> AuthProviderResult<Vec<String>> {
        Ok(self.read()?.reset_requests.clone())
    }

    /// Rotates the token of the current session and publishes the refresh.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::NoSession`] when nobody is signed in.
    pub fn refresh_token(&self) -> AuthProviderResult<Session> {
        let mut state = self.write()?;
        let user = state
            .current
            .as_ref()
            .map(|session| session.user().clone())
            .ok_or(AuthProviderError::NoSession)?;
        let session = self.issue(user);
        state.current = Some(session.clone());
        drop(state);
        self.publish(AuthEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    fn issue(&self, user: AuthenticatedUser) -> Session {
        let expires_at = self.clock.utc() + Duration::hours(TOKEN_LIFETIME_HOURS);
        Session::new(user, Uuid::new_v4().simple().to_string(), expires_at)
    }

    fn publish(&self, event: AuthEvent) {
        // A send error only means nobody is listening.
        if self.events.send(event).is_err() {
            tracing::trace!("auth event dropped without subscribers");
        }
    }

    fn read(&self) -> AuthProviderResult<std::sync::RwLockReadGuard<'_, ProviderState>> {
        self.state
            .read()
            .map_err(|err| AuthProviderError::provider(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> AuthProviderResult<std::sync::RwLockWriteGuard<'_, ProviderState>> {
        self.state
            .write()
            .map_err(|err| AuthProviderError::provider(std::io::Error::other(err.to_string())))
    }
}

fn insert_account(
    state: &mut ProviderState,
    credentials: &Credentials,
) -> AuthProviderResult<AuthenticatedUser> {
    let key = credentials.email().to_ascii_lowercase();
    if state.accounts.contains_key(&key) {
        return Err(AuthProviderError::AccountExists(credentials.email().to_owned()));
    }
    let user = AuthenticatedUser::new(UserId::new(), credentials.email());
    state.accounts.insert(
        key,
        Account {
            user: user.clone(),
            password: credentials.password().to_owned(),
        },
    );
    Ok(user)
}

#[async_trait]
impl<C: Clock + Send + Sync> AuthProvider for InMemoryAuthProvider<C> {
    async fn current_session(&self) -> AuthProviderResult<Option<Session>> {
        let state = self.read()?;
        let now = self.clock.utc();
        Ok(state
            .current
            .as_ref()
            .filter(|session| !session.is_expired_at(now))
            .cloned())
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> AuthProviderResult<Session> {
        let mut state = self.write()?;
        let account = state
            .accounts
            .get(&credentials.email().to_ascii_lowercase())
            .filter(|account| account.password == credentials.password())
            .cloned()
            .ok_or(AuthProviderError::InvalidCredentials)?;
        let session = self.issue(account.user);
        state.current = Some(session.clone());
        drop(state);
        self.publish(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, credentials: &Credentials) -> AuthProviderResult<SignUpOutcome> {
        let mut state = self.write()?;
        let user = insert_account(&mut state, credentials)?;
        if self.require_confirmation {
            return Ok(SignUpOutcome::ConfirmationRequired);
        }
        let session = self.issue(user);
        state.current = Some(session.clone());
        drop(state);
        self.publish(AuthEvent::SignedIn(session.clone()));
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_out(&self) -> AuthProviderResult<()> {
        self.write()?.current = None;
        self.publish(AuthEvent::SignedOut);
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> AuthProviderResult<()> {
        self.write()?.reset_requests.push(email.trim().to_owned());
        Ok(())
    }

    async fn update_password(&self, password: &NewPassword) -> AuthProviderResult<()> {
        let mut state = self.write()?;
        let email = state
            .current
            .as_ref()
            .map(|session| session.user().email().to_ascii_lowercase())
            .ok_or(AuthProviderError::NoSession)?;
        let account = state
            .accounts
            .get_mut(&email)
            .ok_or(AuthProviderError::NoSession)?;
        password.as_str().clone_into(&mut account.password);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
