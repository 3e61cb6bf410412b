//! Domain model for authenticated sessions.

mod credentials;
mod error;
mod event;
mod user;

pub use credentials::{Credentials, NewPassword};
pub use error::SessionDomainError;
pub use event::AuthEvent;
pub use user::{AuthenticatedUser, Session, UserId};
