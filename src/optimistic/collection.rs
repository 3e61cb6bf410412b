//! Page-local cache of remote rows.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Proof that a reload was started; required to publish its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a reload ticket must be finished or the collection keeps reporting a reload"]
pub struct ReloadTicket {
    generation: u64,
}

impl ReloadTicket {
    /// Returns the reload generation this ticket belongs to.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct CollectionState<T> {
    items: Vec<T>,
    issued: u64,
    applied: u64,
    in_flight: usize,
    attached: bool,
}

/// Rows one page shows, shared between its handlers.
///
/// Cloning yields another handle to the same rows. Once
/// [`LocalCollection::detach`] is called (the page unmounted) every update
/// and every late reload result becomes a no-op.
#[derive(Debug)]
pub struct LocalCollection<T> {
    state: Arc<RwLock<CollectionState<T>>>,
}

impl<T> Clone for LocalCollection<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for LocalCollection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> LocalCollection<T> {
    /// Creates an attached collection holding `items`.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            state: Arc::new(RwLock::new(CollectionState {
                items,
                issued: 0,
                applied: 0,
                in_flight: 0,
                attached: true,
            })),
        }
    }

    /// Runs `read` against the current rows.
    #[must_use]
    pub fn with_items<R>(&self, read: impl FnOnce(&[T]) -> R) -> R {
        read(&self.read().items)
    }

    /// Returns the number of cached rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    /// Returns `true` when no rows are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    /// Mutates the cached rows in place.
    ///
    /// Returns `None` without calling `change` once the collection has been
    /// detached.
    pub fn update<R>(&self, change: impl FnOnce(&mut Vec<T>) -> R) -> Option<R> {
        let mut state = self.write();
        if !state.attached {
            return None;
        }
        Some(change(&mut state.items))
    }

    /// Starts a reload and returns the ticket that may publish its result.
    pub fn begin_reload(&self) -> ReloadTicket {
        let mut state = self.write();
        state.issued += 1;
        state.in_flight += 1;
        ReloadTicket {
            generation: state.issued,
        }
    }

    /// Publishes the rows fetched for `ticket`.
    ///
    /// The rows replace the cache only when the collection is still attached
    /// and no newer reload result has been applied; returns whether they
    /// were applied.
    pub fn finish_reload(&self, ticket: ReloadTicket, items: Vec<T>) -> bool {
        let mut state = self.write();
        state.in_flight = state.in_flight.saturating_sub(1);
        if !state.attached || ticket.generation <= state.applied {
            return false;
        }
        state.applied = ticket.generation;
        state.items = items;
        true
    }

    /// Ends a reload that produced no rows.
    pub fn abandon_reload(&self, ticket: ReloadTicket) {
        let mut state = self.write();
        state.in_flight = state.in_flight.saturating_sub(1);
        tracing::trace!(generation = ticket.generation, "reload abandoned");
    }

    /// Returns the number of reloads started but not yet finished.
    #[must_use]
    pub fn reloads_in_flight(&self) -> usize {
        self.read().in_flight
    }

    /// Returns `true` until the owning page unmounts.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.read().attached
    }

    /// Marks the owning page as unmounted.
    pub fn detach(&self) {
        self.write().attached = false;
    }

    fn read(&self) -> RwLockReadGuard<'_, CollectionState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CollectionState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> LocalCollection<T> {
    /// Returns a copy of the cached rows.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.read().items.clone()
    }
}
