//! Error types for feriae-api

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use feriae_search::SearchFailure;
use serde_json::json;
use thiserror::Error;

/// Result type alias for feriae-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while starting or running the server
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Binding or serving failed
    #[error("Server error on {addr}: {source}")]
    Serve {
        /// Listen address
        addr: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned to HTTP clients as `{"detail": ...}`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    /// No record with the requested id.
    #[error("Not found.")]
    NotFound,

    /// Page number is not a positive integer within range.
    #[error("Invalid page.")]
    InvalidPage,

    /// The search backend failed; the cause is logged, not returned.
    #[error("Error while fetching data from meilisarch")]
    SearchUnavailable(#[from] SearchFailure),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::InvalidPage => StatusCode::NOT_FOUND,
            Self::SearchUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
