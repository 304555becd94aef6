//! Error types for feriae-cli

use thiserror::Error;

/// Result type alias for feriae-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in feriae-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from feriae-core
    #[error(transparent)]
    Core(#[from] feriae_core::Error),

    /// Error from the API server
    #[error(transparent)]
    Api(#[from] feriae_api::Error),

    /// Error from the ingestion job
    #[error(transparent)]
    Ingest(#[from] feriae_ingest::IngestError),

    /// The search backend failed or could not be reached
    #[error("Error connecting to MeiliSearch: {0}")]
    Search(#[from] feriae_search::BackendError),
}
