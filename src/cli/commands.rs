//! CLI command implementations
//!
//! Boot order for `serve`: configuration, logging, pool, migrations,
//! listener. `migrate` stops after migrations.

use crate::db::{self, DbPool, DEFAULT_POOL_SIZE};
use crate::http_server::{AppConfig, HttpServer};
use crate::observability::LoggingConfig;

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = resolve_config(&cli, AppConfig::from_env()?);

    LoggingConfig::new("info", config.log_format).init()?;

    run_command(cli.command.unwrap_or(Command::Serve { host: None, port: None }), config)
}

/// Apply command-line overrides on top of the environment configuration
pub fn resolve_config(cli: &Cli, mut config: AppConfig) -> AppConfig {
    if let Some(url) = &cli.database_url {
        config.database_url = url.clone();
    }
    if let Some(environment) = cli.environment {
        config.environment = environment;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(Command::Serve { host, port }) = &cli.command {
        if let Some(host) = host {
            config.host = host.clone();
        }
        if let Some(port) = port {
            config.port = *port;
        }
    }
    config
}

/// Run the appropriate command
pub fn run_command(cmd: Command, config: AppConfig) -> CliResult<()> {
    match cmd {
        Command::Serve { .. } => serve(config),
        Command::Migrate => migrate(&config).map(|_| ()),
    }
}

/// Open the pool and bring the schema up to date
pub fn migrate(config: &AppConfig) -> CliResult<DbPool> {
    let pool = db::create_pool(&config.database_url, DEFAULT_POOL_SIZE)?;
    db::run_migrations(&pool)?;
    tracing::info!(database = %config.database_url, "database ready");
    Ok(pool)
}

/// Migrate, then serve until shutdown
pub fn serve(config: AppConfig) -> CliResult<()> {
    let pool = migrate(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(HttpServer::new(config, pool).start())?;
    Ok(())
}
