//! Authenticated identity for the dashboard.
//!
//! The hosted auth provider owns accounts and tokens. This module keeps the
//! current identity as an explicit [`services::SessionContext`] value that
//! pages receive at construction, with an init boundary (session restored or
//! signed in) and a teardown boundary (signed out). Every owned read and
//! write asks the context for the current [`domain::UserId`] first.
//!
//! - Domain types in [`domain`]
//! - Provider contract in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Context and sign-in orchestration in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
