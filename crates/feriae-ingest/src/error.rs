//! Error types for holiday ingestion.

use thiserror::Error;

/// Ingestion errors.
///
/// Every failure to obtain data from the upstream API renders as
/// `Error while fetching Public Holiday API [...]`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// Transport failure or undecodable body.
    #[error("Error while fetching Public Holiday API [{message}]")]
    Fetch {
        /// What went wrong
        message: String,
        /// Source error if available
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The upstream API answered with a non-success status.
    #[error("Error while fetching Public Holiday API [{status}]")]
    Status {
        /// HTTP status, e.g. `500 Internal Server Error`
        status: reqwest::StatusCode,
    },

    /// The upstream API kept answering `204 No Content`.
    #[error("Error while fetching Public Holiday API [no content after {attempts} attempts]")]
    NoContent {
        /// Attempts made
        attempts: usize,
    },

    /// The upstream API offered no countries to choose from.
    #[error("Error while fetching Public Holiday API [no countries available]")]
    NoCountries,

    /// Loading or saving the record store failed.
    #[error(transparent)]
    Store(#[from] feriae_core::Error),
}

impl IngestError {
    /// Fetch error from a transport error.
    pub fn fetch(source: reqwest::Error) -> Self {
        Self::Fetch {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Whether trying again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NoContent { .. })
    }
}

/// Result type for ingestion.
pub type Result<T> = std::result::Result<T, IngestError>;
