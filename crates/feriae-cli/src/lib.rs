//! # feriae-cli
//!
//! Command-line interface for Feriae.
//!
//! - `serve`: run the HTTP API
//! - `populate-models`: ingest holidays from the upstream API
//! - `populate-index`: bulk-load the search index
//! - `config`: inspect and edit the TOML configuration

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;

pub use cli::{Cli, Command, ConfigAction};
pub use config::FeriaeConfig;
pub use error::{Error, Result};
