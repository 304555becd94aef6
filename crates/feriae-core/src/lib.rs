//! Feriae Core: shared types, errors, and the record store.
//!
//! This crate has no internal Feriae dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`holiday`]: The public holiday record model
//! - [`catalog`]: Queryable/sortable field catalog
//! - [`store`]: Ordered in-process record store with JSON snapshots
//! - [`config`]: The [`ConfigManager`] trait

#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod holiday;
pub mod store;

// Re-export key types at crate root for convenience
pub use catalog::FieldCatalog;
pub use config::{ConfigManager, EnvVars};
pub use error::{Error, Result};
pub use holiday::{NaturalKey, NewHoliday, PublicHoliday};
pub use store::HolidayStore;
