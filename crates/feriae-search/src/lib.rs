//! Feriae Search: query normalization and the search gateway.
//!
//! Untrusted `q`/`sort`/`fields` parameters are normalized against a
//! [`FieldCatalog`](feriae_core::FieldCatalog), then run through a
//! [`SearchGateway`] against any [`SearchBackend`].
//!
//! # Modules
//!
//! - [`query`]: Raw parameters and the total normalizer
//! - [`backend`]: `SearchBackend` trait, `BackendError`, `MockBackend`
//! - [`gateway`]: Deadline-bounded search with uniform failures
//! - [`meilisearch`]: Meilisearch REST backend
//! - [`indexer`]: Bulk index population from the record store
//!
//! # Example
//!
//! ```rust,ignore
//! use feriae_search::{RawQueryParams, SearchGateway, normalize};
//!
//! let params = RawQueryParams::new().with("q", "natale").with("sort", "-date");
//! let request = normalize(&params, FieldCatalog::holidays());
//! let hits = gateway.search(&request).await?;
//! ```

#![forbid(unsafe_code)]

pub mod backend;
pub mod gateway;
pub mod indexer;
pub mod meilisearch;
pub mod query;

mod proptests;

// Re-exports
pub use backend::{
    BackendCall, BackendError, BackendQuery, Document, FailOn, MockBackend, SearchBackend,
};
pub use gateway::{DEFAULT_TIMEOUT, SearchFailure, SearchGateway};
pub use indexer::{PopulateOutcome, populate, to_document};
pub use meilisearch::{MeilisearchBackend, SearchSettings};
pub use query::{NormalizedQuery, Projection, RawQueryParams, SortDirection, SortSpec, normalize};
