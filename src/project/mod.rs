//! Project catalog.
//!
//! Projects group tasks and report progress as the share of their tasks in
//! the terminal status. The catalog page lists, searches, creates, edits,
//! and deletes the signed-in user's projects through the optimistic
//! mutation controller.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
