//! Project task board.
//!
//! Tasks belong to a project and sit in one of four status columns. The
//! board is a derived view: [`domain::StatusBoard`] partitions the cached
//! task list by status, [`domain::resolve_drag`] turns a drag-end signal into
//! a target status, and [`services::TaskBoardService`] applies status
//! changes and task edits optimistically through the
//! [`crate::optimistic::MutationController`]. The module follows hexagonal
//! architecture:
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
