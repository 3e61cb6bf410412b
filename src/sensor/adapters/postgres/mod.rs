//! `PostgreSQL` adapter for sensor and reading persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresReadingRepository, PostgresSensorRepository};
