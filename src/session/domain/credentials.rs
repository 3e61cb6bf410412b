//! Validated sign-in and password-change input.

use super::SessionDomainError;

/// Email and password pair for password sign-in and sign-up.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Validates and creates credentials.
    ///
    /// The email is trimmed; the password is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::InvalidEmail`] when the email is blank or
    /// has no `@`, or [`SessionDomainError::EmptyPassword`] when the password
    /// is empty.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, SessionDomainError> {
        let raw_email = email.into();
        let trimmed = raw_email.trim();
        if trimmed.is_empty() || !trimmed.contains('@') {
            return Err(SessionDomainError::InvalidEmail(raw_email));
        }
        let password_value = password.into();
        if password_value.is_empty() {
            return Err(SessionDomainError::EmptyPassword);
        }
        Ok(Self {
            email: trimmed.to_owned(),
            password: password_value,
        })
    }

    /// Returns the normalized email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Replacement password confirmed by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(String);

impl NewPassword {
    /// Minimum password length accepted by the provider.
    pub const MIN_LENGTH: usize = 6;

    /// Validates a password and its confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::PasswordMismatch`] when the two values
    /// differ, or [`SessionDomainError::PasswordTooShort`] when the password
    /// has fewer than [`Self::MIN_LENGTH`] characters.
    pub fn new(password: &str, confirmation: &str) -> Result<Self, SessionDomainError> {
        if password != confirmation {
            return Err(SessionDomainError::PasswordMismatch);
        }
        if password.chars().count() < Self::MIN_LENGTH {
            return Err(SessionDomainError::PasswordTooShort {
                minimum: Self::MIN_LENGTH,
            });
        }
        Ok(Self(password.to_owned()))
    }

    /// Returns the password value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}
