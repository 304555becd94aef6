//! Search backend trait and errors.
//!
//! This module defines the `SearchBackend` trait that the gateway and the
//! index populator talk to, plus the request/response types on that seam.
//!
//! # Backends
//!
//! - `MeilisearchBackend`: Meilisearch over its REST API
//! - `MockBackend`: records calls and replays canned results (tests, demos)

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An opaque search document: field name to JSON value.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A query as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendQuery {
    /// Free-text term.
    pub q: String,
    /// Sort specifications, `<field>:<asc|desc>`.
    pub sort: Vec<String>,
    /// Attributes to return, `["*"]` for all.
    #[serde(rename = "attributesToRetrieve")]
    pub attributes_to_retrieve: Vec<String>,
}

/// Errors reported by a search backend.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BackendError {
    /// The backend could not be reached or the connection broke.
    #[error("communication error: {message}")]
    Communication {
        /// What went wrong
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered and rejected the request.
    #[error("backend rejected request (HTTP {status}, code {code}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Backend error code, e.g. `invalid_search_sort`
        code: String,
        /// Backend error message
        message: String,
    },

    /// The call did not complete in time.
    #[error("backend call timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with a body we could not decode.
    #[error("unexpected backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Creates a communication error with a message.
    pub fn communication<S: Into<String>>(message: S) -> Self {
        BackendError::Communication {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a communication error with a message and source error.
    pub fn communication_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        BackendError::Communication {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the backend itself rejected the request, as opposed to the
    /// request never getting an answer.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Decode(_))
    }
}

/// Abstract search backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Declare which fields may be used for sorting. Idempotent.
    async fn update_sortable_attributes(&self, fields: &[String]) -> Result<(), BackendError>;

    /// Run a query and return the hits in backend order.
    async fn search(&self, query: &BackendQuery) -> Result<Vec<Document>, BackendError>;

    /// Add or replace documents in the index.
    async fn add_documents(&self, documents: &[Document]) -> Result<(), BackendError>;

    /// Get the backend name for diagnostics.
    fn name(&self) -> &str;
}

// ============================================================================
// MockBackend
// ============================================================================

/// A call observed by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// `update_sortable_attributes(fields)`
    UpdateSortable(Vec<String>),
    /// `search(query)`
    Search(BackendQuery),
    /// `add_documents(documents)`
    AddDocuments(Vec<Document>),
}

/// Which mock operation should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    /// Sortable-attributes declaration.
    UpdateSortable,
    /// Query.
    Search,
    /// Document upload.
    AddDocuments,
}

/// In-memory backend that records every call.
///
/// Searches return the configured hits; a configured failure answers with a
/// `BackendError::Api` (HTTP 500) on the chosen operation.
#[derive(Debug, Default)]
pub struct MockBackend {
    hits: Vec<Document>,
    fail_on: Option<FailOn>,
    calls: Mutex<Vec<BackendCall>>,
}

impl MockBackend {
    /// Create a mock returning no hits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock returning `hits` for every search.
    pub fn with_hits(hits: Vec<Document>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    /// Make the given operation fail.
    pub fn failing_on(mut self, op: FailOn) -> Self {
        self.fail_on = Some(op);
        self
    }

    /// Snapshot of the calls observed so far.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// The last query passed to `search`, if any.
    pub fn last_search(&self) -> Option<BackendQuery> {
        self.calls().into_iter().rev().find_map(|call| match call {
            BackendCall::Search(query) => Some(query),
            _ => None,
        })
    }

    fn record(&self, call: BackendCall, op: FailOn) -> Result<(), BackendError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.fail_on == Some(op) {
            return Err(BackendError::Api {
                status: 500,
                code: "internal".to_string(),
                message: "An error occurred.".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn update_sortable_attributes(&self, fields: &[String]) -> Result<(), BackendError> {
        self.record(BackendCall::UpdateSortable(fields.to_vec()), FailOn::UpdateSortable)
    }

    async fn search(&self, query: &BackendQuery) -> Result<Vec<Document>, BackendError> {
        self.record(BackendCall::Search(query.clone()), FailOn::Search)?;
        Ok(self.hits.clone())
    }

    async fn add_documents(&self, documents: &[Document]) -> Result<(), BackendError> {
        self.record(
            BackendCall::AddDocuments(documents.to_vec()),
            FailOn::AddDocuments,
        )
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Tests
// ============================================================================
