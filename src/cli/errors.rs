//! CLI-specific error types
//!
//! Every CLI error is fatal: it is printed to stderr and the process exits
//! non-zero.

use thiserror::Error;

use crate::db::StoreError;
use crate::http_server::ConfigError;
use crate::observability::LoggingError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Database could not be opened or migrated
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Logging could not be initialized
    #[error("{0}")]
    Logging(#[from] LoggingError),

    /// Runtime or listener I/O failure
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "BLOGFUL_CLI_CONFIG_ERROR",
            CliError::Store(_) => "BLOGFUL_CLI_STORE_ERROR",
            CliError::Logging(_) => "BLOGFUL_CLI_LOGGING_ERROR",
            CliError::Io(_) => "BLOGFUL_CLI_IO_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
