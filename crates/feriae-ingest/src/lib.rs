//! Feriae Ingest: public holiday ingestion from the Nager.Date API.
//!
//! - [`client`]: HTTP client and `[upstream]` settings
//! - [`job`]: The `populate-models` job
//! - [`error`]: `IngestError`

#![forbid(unsafe_code)]

pub mod client;
pub mod error;
pub mod job;

pub use client::{Country, NagerClient, UpstreamSettings};
pub use error::{IngestError, Result};
pub use job::{IngestReport, IngestRequest, fetch_holidays, populate_models};
