//! Shared, read-only application state.

use std::sync::Arc;

use feriae_core::{FieldCatalog, HolidayStore};
use feriae_search::SearchGateway;

/// Default number of records per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// State handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<HolidayStore>,
    gateway: SearchGateway,
    page_size: usize,
}

impl AppState {
    /// Create state over a loaded store and a search gateway.
    pub fn new(store: HolidayStore, gateway: SearchGateway) -> Self {
        Self {
            store: Arc::new(store),
            gateway,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the listing page size. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Record store snapshot.
    pub fn store(&self) -> &HolidayStore {
        &self.store
    }

    /// Search gateway.
    pub fn gateway(&self) -> &SearchGateway {
        &self.gateway
    }

    /// Catalog the search endpoint validates against.
    pub fn catalog(&self) -> &FieldCatalog {
        self.gateway.catalog()
    }

    /// Listing page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}
