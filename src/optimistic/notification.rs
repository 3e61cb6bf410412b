//! User-facing notifications ("toasts").

use std::sync::{Arc, PoisonError, RwLock};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// The operation completed.
    Success,
    /// The operation failed; the detail carries the error text.
    Failure,
}

/// Message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    level: NotificationLevel,
    title: String,
    detail: Option<String>,
}

impl Notification {
    /// Creates a success notification.
    #[must_use]
    pub fn success(title: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            detail,
        }
    }

    /// Creates a failure notification carrying the raw error message.
    #[must_use]
    pub fn failure(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Failure,
            title: title.into(),
            detail: Some(detail.into()),
        }
    }

    /// Returns the severity.
    #[must_use]
    pub const fn level(&self) -> NotificationLevel {
        self.level
    }

    /// Returns the headline.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the detail text, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Shows `notification` to the user.
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Notifier that writes notifications to the `tracing` pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let detail = notification.detail().unwrap_or_default();
        match notification.level() {
            NotificationLevel::Success => {
                tracing::info!(title = notification.title(), detail, "notification");
            }
            NotificationLevel::Failure => {
                tracing::warn!(title = notification.title(), detail, "notification");
            }
        }
    }
}

/// Notifier that keeps notifications in memory for a UI to drain.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    entries: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notification recorded so far.
    #[must_use]
    pub fn recorded(&self) -> Vec<Notification> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the recorded notifications.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.write().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns the most recent notification.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
