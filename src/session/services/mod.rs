//! Session context and sign-in orchestration.

mod authentication;
mod context;

pub use authentication::{SessionService, SessionServiceError, SessionServiceResult};
pub use context::{SessionContext, SessionError};
