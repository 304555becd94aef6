//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Feriae - public holiday catalog with search
#[derive(Parser, Debug)]
#[command(name = "feriae", version)]
#[command(about = "Public holiday catalog with Meilisearch-backed search", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "FERIAE_CONFIG")]
    pub config: Option<String>,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch a year of public holidays into the record store
    PopulateModels {
        /// ISO 3166-1 alpha-2 country code (random if omitted)
        #[arg(long)]
        country: Option<String>,
        /// Year to fetch (current year if omitted)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Load every stored record into the search index
    PopulateIndex,

    /// Configuration management
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print a value by dotted key, e.g. `search.url`
    Get {
        /// Dotted key
        key: String,
    },
    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value (bool, integer, float or string)
        value: String,
    },
    /// Write a default config file
    Init {
        /// Target file (default location if omitted)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for docker
        #[arg(long)]
        docker_env: bool,
    },
}
