//! Shared helpers for `PostgreSQL` integration tests.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::Clock;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::fixture;
use std::sync::{Arc, PoisonError, RwLock};
use taskpulse::store::PgPool;
use tokio::runtime::Runtime;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Schema applied to the template database.
pub const MIGRATION_UP_SQL: &str =
    include_str!("../../migrations/2025-06-01-000000_create_dashboard/up.sql");

/// Reverts [`MIGRATION_UP_SQL`].
pub const MIGRATION_DOWN_SQL: &str =
    include_str!("../../migrations/2025-06-01-000000_create_dashboard/down.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "taskpulse_test_template";

/// Creates a tokio runtime for driving repository futures.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(MIGRATION_UP_SQL)
                .map_err(|e| eyre::eyre!("migration failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Creates a database from the template and returns a pool onto it.
///
/// # Errors
///
/// Returns an error if database creation or pool construction fails.
pub fn setup_pool(cluster: &TestCluster, db_name: &str) -> Result<PgPool, BoxError> {
    cluster
        .create_database_from_template(db_name, TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let url = cluster.connection().database_url(db_name);
    let manager = ConnectionManager::<PgConnection>::new(url);
    Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Box::new(e) as BoxError)
}

/// Opens a direct connection for raw SQL the repositories never issue.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub fn connect(cluster: &TestCluster, db_name: &str) -> Result<PgConnection, BoxError> {
    let url = cluster.connection().database_url(db_name);
    PgConnection::establish(&url).map_err(|e| Box::new(e) as BoxError)
}

/// Drops the per-test database even when the test panics.
pub struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl<'a> CleanupGuard<'a> {
    pub const fn new(cluster: &'a TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.db_name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.db_name);
        }
    }
}

/// Per-test database: a pool, a runtime, and the guard that drops it.
pub struct TestDatabase {
    pub cluster: &'static TestCluster,
    pub db_name: String,
    pub pool: PgPool,
    pub rt: Runtime,
    _guard: CleanupGuard<'static>,
}

impl TestDatabase {
    /// Creates a fresh database named after `label`.
    pub fn create(cluster: &'static TestCluster, label: &str) -> Self {
        ensure_template(cluster).expect("template setup");
        let db_name = format!("test_{label}_{}", uuid::Uuid::new_v4().simple());
        let guard = CleanupGuard::new(cluster, db_name.clone());
        let pool = setup_pool(cluster, &db_name).expect("pool setup");
        Self {
            cluster,
            db_name,
            pool,
            rt: test_runtime(),
            _guard: guard,
        }
    }

    /// Runs raw SQL against this database.
    pub fn execute(&self, sql: &str) {
        let mut conn = connect(self.cluster, &self.db_name).expect("direct connection");
        conn.batch_execute(sql).expect("raw SQL");
    }
}

/// Clock pinned to whole seconds so timestamps survive a database round trip.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl SteppingClock {
    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Provides a [`SteppingClock`] starting at 2025-06-02 12:00 UTC.
#[fixture]
pub fn clock() -> SteppingClock {
    let start = Utc
        .with_ymd_and_hms(2025, 6, 2, 12, 0, 0)
        .single()
        .expect("valid start instant");
    SteppingClock {
        now: Arc::new(RwLock::new(start)),
    }
}
