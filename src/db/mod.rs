//! # Relational Store
//!
//! Connection pooling, embedded migrations, and the bridge that runs
//! synchronous Diesel queries from async handlers.
//!
//! The pool is built once by the bootstrap and shared by every request;
//! nothing in the articles layer opens or closes connections.

pub mod errors;
pub mod schema;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub use errors::{StoreError, StoreResult};

/// Embedded migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Applies per-connection pragmas when the pool opens a connection.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query("PRAGMA busy_timeout = 5000")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        Ok(())
    }
}

/// Create a connection pool for the given database URL.
///
/// # Errors
/// Returns an error if the pool cannot open its initial connections.
pub fn create_pool(database_url: &str, max_size: u32) -> StoreResult<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)?;
    Ok(pool)
}

/// Run all pending migrations.
///
/// # Errors
/// Returns an error if a migration fails to apply.
pub fn run_migrations(pool: &DbPool) -> StoreResult<()> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Migration(e.to_string()))?;
    tracing::debug!(count = applied.len(), "migrations applied");
    Ok(())
}

/// Run a blocking store operation on a pooled connection.
///
/// Exactly one connection is checked out for the duration of `op` and
/// returned to the pool afterwards.
pub async fn interact<F, T>(pool: &DbPool, op: F) -> StoreResult<T>
where
    F: FnOnce(&mut SqliteConnection) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        op(&mut conn)
    })
    .await?
}
