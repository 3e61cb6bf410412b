//! Optimistic mutation and reconciliation.
//!
//! Pages keep the rows they render in a [`LocalCollection`]. A mutation
//! changes that cache first, then writes to the remote store through the
//! [`MutationController`]. A rejected write discards the guess by reloading
//! the collection from the store, so the view never keeps a change the
//! backend refused. Users hear about both outcomes through a [`Notifier`].

mod collection;
mod controller;
mod notification;

pub use collection::{LocalCollection, ReloadTicket};
pub use controller::{MutationController, MutationLabels, MutationOutcome, RELOAD_FAILED};
pub use notification::{
    Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier,
};

#[cfg(test)]
mod tests;
