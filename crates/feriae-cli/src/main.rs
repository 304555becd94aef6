//! Feriae CLI
//!
//! Serve the holiday catalog, ingest holidays, and populate the search index.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use feriae_cli::config_handlers::handle_config_command;
use feriae_cli::{Cli, Command, FeriaeConfig, commands};
use feriae_core::ConfigManager;
use feriae_ingest::IngestRequest;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "debug"
    } else {
        "info,feriae=debug"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let config_path = cli.config.as_deref();
    tracing::debug!(config = ?config_path, command = ?cli.command, "starting feriae");

    match cli.command {
        Command::Config { action } => {
            println!("{}", handle_config_command(config_path, &action)?);
        }
        Command::Serve { host, port } => {
            let mut config = FeriaeConfig::load(config_path)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            commands::serve(&config).await?;
        }
        Command::PopulateModels { country, year } => {
            let config = FeriaeConfig::load(config_path)?;
            let message = commands::ingest(&config, IngestRequest { country, year }).await?;
            println!("{message}");
        }
        Command::PopulateIndex => {
            let config = FeriaeConfig::load(config_path)?;
            println!("{}", commands::populate_index(&config).await?);
        }
    }

    Ok(())
}
