//! Safe parent views used when a page cannot load its data.

use std::fmt;

/// Top-level views a failed detail page falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in page, used when no identity is present.
    Login,
    /// Project list.
    Projects,
    /// Sensor list.
    Sensors,
}

impl Route {
    /// Returns the route path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Projects => "/projects",
            Self::Sensors => "/sensors",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Instruction to leave a page whose initial load failed.
///
/// Pages return this instead of rendering partial data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    to: Route,
    reason: String,
}

impl Redirect {
    /// Creates a redirect to `to` explaining why.
    #[must_use]
    pub fn new(to: Route, reason: impl Into<String>) -> Self {
        Self {
            to,
            reason: reason.into(),
        }
    }

    /// Returns the destination.
    #[must_use]
    pub const fn to(&self) -> Route {
        self.to
    }

    /// Returns the failure text shown to the user.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "redirect to {}: {}", self.to, self.reason)
    }
}

impl std::error::Error for Redirect {}
