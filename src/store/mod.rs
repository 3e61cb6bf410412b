//! Shared `PostgreSQL` connection pool for the remote store adapters.
//!
//! Diesel connections are synchronous, so adapters run each query on the
//! blocking thread pool through [`run_blocking`].

use crate::config::DatabaseConfig;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tracing::debug;

/// `PostgreSQL` connection pool shared by every adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Errors raised by the pool itself rather than by a query.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The pool could not be built or a connection could not be checked out.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// The blocking task running a query panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds a connection pool from configuration.
///
/// # Errors
///
/// Returns [`StoreError::Pool`] when the initial connections cannot be
/// established.
pub fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    debug!(max_connections = config.max_connections, "building connection pool");
    let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(config.connection_timeout())
        .build(manager)?;
    Ok(pool)
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// # Errors
///
/// Returns the closure's error, or a [`StoreError`] converted into `E` when
/// no connection is available or the blocking task fails.
pub async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<StoreError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(|err| E::from(StoreError::from(err)))?;
        f(&mut connection)
    })
    .await
    .map_err(|err| E::from(StoreError::from(err)))?
}
