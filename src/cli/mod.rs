//! CLI module for blogful
//!
//! Provides command-line interface for:
//! - serve: Apply migrations and run the HTTP API
//! - migrate: Apply migrations only

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{migrate, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliResult};
