//! Apply-locally, write-remotely, reload-on-failure routine.

use super::{LocalCollection, Notification, Notifier};
use std::fmt;
use std::sync::Arc;

/// Headline of the notification raised when a reload from the store fails.
pub const RELOAD_FAILED: &str = "Erro ao recarregar dados";

/// Notification text for one kind of mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationLabels {
    success_title: String,
    success_detail: Option<String>,
    failure_title: String,
}

impl MutationLabels {
    /// Creates labels from the success and failure headlines.
    #[must_use]
    pub fn new(success_title: impl Into<String>, failure_title: impl Into<String>) -> Self {
        Self {
            success_title: success_title.into(),
            success_detail: None,
            failure_title: failure_title.into(),
        }
    }

    /// Adds a detail line to the success notification.
    #[must_use]
    pub fn with_success_detail(mut self, detail: impl Into<String>) -> Self {
        self.success_detail = Some(detail.into());
        self
    }

    /// Returns the success headline.
    #[must_use]
    pub fn success_title(&self) -> &str {
        &self.success_title
    }

    /// Returns the failure headline.
    #[must_use]
    pub fn failure_title(&self) -> &str {
        &self.failure_title
    }
}

/// How an optimistic mutation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<O, E> {
    /// The remote store accepted the write; the local change stands.
    Committed(O),
    /// The remote store rejected the write and the local change was
    /// discarded.
    RolledBack {
        /// Error returned by the remote write.
        error: E,
        /// Whether a reload replaced the cached rows.
        reloaded: bool,
    },
}

impl<O, E> MutationOutcome<O, E> {
    /// Converts the outcome into a `Result`, dropping the reload flag.
    ///
    /// # Errors
    ///
    /// Returns the remote error of a rolled-back mutation.
    pub fn into_result(self) -> Result<O, E> {
        match self {
            Self::Committed(output) => Ok(output),
            Self::RolledBack { error, .. } => Err(error),
        }
    }

    /// Returns `true` when the remote write succeeded.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Runs mutations against a [`LocalCollection`] and a remote store.
///
/// One controller serves every entity type; the collection, the remote
/// write and the reload are supplied per call.
pub struct MutationController<N: Notifier> {
    notifier: Arc<N>,
}

impl<N: Notifier> Clone for MutationController<N> {
    fn clone(&self) -> Self {
        Self {
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<N: Notifier> MutationController<N> {
    /// Creates a controller reporting through `notifier`.
    #[must_use]
    pub const fn new(notifier: Arc<N>) -> Self {
        Self { notifier }
    }

    /// Returns the notifier.
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Reports an error that stopped an operation before any remote call.
    pub fn reject(&self, title: &str, error: &impl fmt::Display) {
        self.notifier
            .notify(Notification::failure(title, error.to_string()));
    }

    /// Applies `apply_local` to `collection`, then awaits `remote_write`.
    ///
    /// `apply_local` runs synchronously before the write is polled, so the
    /// change is visible to readers of the collection while the write is in
    /// flight. On success a success notification is sent and the local
    /// change stands. On failure the raw error text is sent as a failure
    /// notification and `reload` replaces the cached rows with the store's
    /// state. Each failure issues its own reload; a superseded or late
    /// reload result is ignored by the collection.
    pub async fn run<T, O, E, W, L, LF, RE>(
        &self,
        collection: &LocalCollection<T>,
        labels: MutationLabels,
        apply_local: impl FnOnce(&mut Vec<T>),
        remote_write: W,
        reload: L,
    ) -> MutationOutcome<O, E>
    where
        W: Future<Output = Result<O, E>>,
        E: fmt::Display,
        L: FnOnce() -> LF,
        LF: Future<Output = Result<Vec<T>, RE>>,
        RE: fmt::Display,
    {
        if collection.update(apply_local).is_none() {
            tracing::debug!("optimistic change skipped on detached collection");
        }

        match remote_write.await {
            Ok(output) => {
                tracing::info!(operation = labels.success_title(), "mutation committed");
                self.notifier.notify(Notification::success(
                    labels.success_title,
                    labels.success_detail,
                ));
                MutationOutcome::Committed(output)
            }
            Err(error) => {
                tracing::warn!(
                    operation = labels.failure_title(),
                    error = %error,
                    "mutation rejected, reconciling from remote store"
                );
                self.notifier
                    .notify(Notification::failure(labels.failure_title, error.to_string()));
                let reloaded = if collection.is_attached() {
                    self.reconcile(collection, reload).await
                } else {
                    false
                };
                MutationOutcome::RolledBack { error, reloaded }
            }
        }
    }

    /// Replaces the cached rows with a fresh read from the remote store.
    ///
    /// Returns whether the fetched rows were applied. A failed read is
    /// logged and reported, and the cache is left as it was.
    pub async fn reconcile<T, L, LF, RE>(&self, collection: &LocalCollection<T>, reload: L) -> bool
    where
        L: FnOnce() -> LF,
        LF: Future<Output = Result<Vec<T>, RE>>,
        RE: fmt::Display,
    {
        let ticket = collection.begin_reload();
        match reload().await {
            Ok(items) => {
                let applied = collection.finish_reload(ticket, items);
                tracing::debug!(generation = ticket.generation(), applied, "reload finished");
                applied
            }
            Err(error) => {
                collection.abandon_reload(ticket);
                tracing::error!(error = %error, "reload from remote store failed");
                self.notifier
                    .notify(Notification::failure(RELOAD_FAILED, error.to_string()));
                false
            }
        }
    }
}
