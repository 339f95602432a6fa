//! # Store Errors
//!
//! Failures raised by the relational store. These are never translated
//! by the articles layer; they surface as 500s through the fault boundary.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Relational store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query or constraint failure reported by the driver
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// Connection could not be checked out of the pool
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    /// Embedded migrations could not be applied
    #[error("migration failed: {0}")]
    Migration(String),

    /// The blocking task running the query panicked or was cancelled
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
