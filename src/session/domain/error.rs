//! Error types for session input validation.

use thiserror::Error;

/// Errors returned while validating authentication input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionDomainError {
    /// The email address is blank or lacks an `@`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// The new password is shorter than the provider minimum.
    #[error("password must be at least {minimum} characters long")]
    PasswordTooShort {
        /// Minimum accepted length.
        minimum: usize,
    },

    /// The password confirmation differs from the password.
    #[error("passwords do not match")]
    PasswordMismatch,
}
