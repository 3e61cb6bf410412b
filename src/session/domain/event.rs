//! Session lifecycle events published by the auth provider.

use super::Session;

/// Auth state change pushed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A user signed in, or an existing session was restored.
    SignedIn(Session),
    /// The current user signed out or the session was revoked.
    SignedOut,
    /// The provider rotated the access token for the current user.
    TokenRefreshed(Session),
}

impl AuthEvent {
    /// Returns the session carried by the event, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) | Self::TokenRefreshed(session) => Some(session),
            Self::SignedOut => None,
        }
    }
}
