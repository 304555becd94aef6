//! # feriae-api
//!
//! HTTP API server for the Feriae holiday catalog.
//!
//! This crate provides:
//! - Read-only listing and detail endpoints over the record store
//! - The search endpoint, which normalizes `q`/`sort`/`fields` and forwards
//!   the query through the search gateway
//! - `{"detail": ...}` error bodies
//! - A health endpoint and request tracing

#![forbid(unsafe_code)]

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, Error, Result};
pub use routes::router;
pub use server::{Server, ServerSettings};
pub use state::AppState;
