//! Deterministic fixtures shared by unit tests.

use crate::session::domain::{AuthEvent, AuthenticatedUser, Session, UserId};
use crate::session::services::SessionContext;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, PoisonError, RwLock};

/// Returns a context with `owner` signed in.
pub fn signed_in(owner: UserId) -> SessionContext {
    let context = SessionContext::new();
    sign_in(&context, owner);
    context
}

/// Replaces whoever is signed in to `context` with `owner`.
pub fn sign_in(context: &SessionContext, owner: UserId) {
    context.teardown();
    let user = AuthenticatedUser::new(owner, format!("{owner}@example.com"));
    let expires_at = FixedClock::default().utc() + Duration::hours(1);
    context.apply(&AuthEvent::SignedIn(Session::new(user, "token", expires_at)));
}

/// Clock pinned to an instant that tests can move forward.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}
