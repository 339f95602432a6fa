//! CLI argument definitions using clap
//!
//! Commands:
//! - blogful serve [--host <host>] [--port <port>]
//! - blogful migrate
//!
//! Options given on the command line override the environment.

use clap::{Parser, Subcommand};

use crate::http_server::Environment;
use crate::observability::LogFormat;

/// blogful - articles HTTP service
#[derive(Parser, Debug)]
#[command(name = "blogful")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database path (overrides DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Deployment environment: production, development or test (overrides APP_ENV)
    #[arg(long, global = true)]
    pub environment: Option<Environment>,

    /// Log format: pretty or json (overrides LOG_FORMAT)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply migrations and serve the HTTP API (default)
    Serve {
        /// Host to bind to (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Apply pending migrations and exit
    Migrate,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["blogful"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "blogful",
            "serve",
            "--port",
            "9000",
            "--environment",
            "production",
            "--database-url",
            "/tmp/x.db",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Serve {
                host: None,
                port: Some(9000)
            })
        );
        assert_eq!(cli.environment, Some(Environment::Production));
        assert_eq!(cli.database_url.as_deref(), Some("/tmp/x.db"));
    }

    #[test]
    fn test_rejects_unknown_environment() {
        assert!(Cli::try_parse_from(["blogful", "--environment", "staging", "migrate"]).is_err());
    }
}
