//! Search gateway.
//!
//! [`SearchGateway`] runs a [`NormalizedQuery`] against a [`SearchBackend`]:
//! it declares the catalog as sortable, then queries, both under one
//! deadline. Any backend failure comes back as [`SearchFailure::Upstream`];
//! the detail goes to the logs only.

use std::sync::Arc;
use std::time::Duration;

use feriae_core::FieldCatalog;
use tokio::time::Instant;

use crate::backend::{BackendError, BackendQuery, Document, SearchBackend};
use crate::query::NormalizedQuery;

/// Default deadline for one gateway call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure of a gateway call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SearchFailure {
    /// The backend could not be reached or rejected the request.
    #[error("upstream search failure")]
    Upstream {
        /// Internal cause, for logs. `None` when the call was abandoned.
        #[source]
        cause: Option<BackendError>,
    },
}

impl SearchFailure {
    fn upstream(cause: BackendError) -> Self {
        Self::Upstream { cause: Some(cause) }
    }

    /// The backend error behind this failure, if one was observed.
    pub fn cause(&self) -> Option<&BackendError> {
        match self {
            Self::Upstream { cause } => cause.as_ref(),
        }
    }
}

/// Result type for gateway calls.
pub type Result<T> = std::result::Result<T, SearchFailure>;

/// Runs normalized queries against a search backend.
#[derive(Clone)]
pub struct SearchGateway {
    backend: Arc<dyn SearchBackend>,
    catalog: FieldCatalog,
    timeout: Duration,
}

impl std::fmt::Debug for SearchGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchGateway")
            .field("backend", &self.backend.name())
            .field("catalog", &self.catalog.fields())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SearchGateway {
    /// Create a gateway with the default timeout.
    pub fn new(backend: Arc<dyn SearchBackend>, catalog: FieldCatalog) -> Self {
        Self {
            backend,
            catalog,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The catalog this gateway declares as sortable.
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Search with a deadline of now plus the configured timeout.
    pub async fn search(&self, request: &NormalizedQuery) -> Result<Vec<Document>> {
        let deadline = Instant::now() + self.timeout;
        self.search_until(request, deadline).await
    }

    /// Search, giving up at `deadline`.
    pub async fn search_until(
        &self,
        request: &NormalizedQuery,
        deadline: Instant,
    ) -> Result<Vec<Document>> {
        let query = BackendQuery {
            q: request.term.clone(),
            sort: vec![request.sort.to_string()],
            attributes_to_retrieve: request.projection.attributes(),
        };

        let started = Instant::now();
        let outcome = tokio::time::timeout_at(deadline, self.run(&query)).await;
        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(started.elapsed())),
        };

        match result {
            Ok(hits) => {
                tracing::debug!(
                    backend = self.backend.name(),
                    term = %query.q,
                    sort = ?query.sort,
                    hits = hits.len(),
                    "search completed"
                );
                Ok(hits)
            }
            Err(e) => {
                if e.is_rejection() {
                    tracing::error!(
                        backend = self.backend.name(),
                        error = %e,
                        "search backend rejected request"
                    );
                } else {
                    tracing::error!(
                        backend = self.backend.name(),
                        error = %e,
                        "search backend unreachable"
                    );
                }
                Err(SearchFailure::upstream(e))
            }
        }
    }

    async fn run(&self, query: &BackendQuery) -> std::result::Result<Vec<Document>, BackendError> {
        self.backend
            .update_sortable_attributes(self.catalog.fields())
            .await?;
        self.backend.search(query).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, FailOn, MockBackend};
    use crate::query::{RawQueryParams, normalize};
    use async_trait::async_trait;

    fn catalog() -> FieldCatalog {
        FieldCatalog::holidays().clone()
    }

    fn hit(id: &str, name: &str) -> Document {
        let mut doc = Document::new();
        doc.insert("id".into(), id.into());
        doc.insert("name".into(), name.into());
        doc
    }

    #[tokio::test]
    async fn test_declares_sortable_then_searches() {
        let mock = Arc::new(MockBackend::new());
        let gateway = SearchGateway::new(mock.clone(), catalog());

        let request = normalize(
            &RawQueryParams::new().with("q", "easter").with("sort", "-date"),
            &catalog(),
        );
        gateway.search(&request).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            BackendCall::UpdateSortable(catalog().fields().to_vec())
        );
        assert_eq!(
            calls[1],
            BackendCall::Search(BackendQuery {
                q: "easter".to_string(),
                sort: vec!["date:desc".to_string()],
                attributes_to_retrieve: vec!["*".to_string()],
            })
        );
    }

    #[tokio::test]
    async fn test_hits_pass_through_in_order() {
        let hits = vec![hit("3", "c"), hit("1", "a"), hit("2", "b")];
        let mock = Arc::new(MockBackend::with_hits(hits.clone()));
        let gateway = SearchGateway::new(mock, catalog());

        let request = normalize(&RawQueryParams::new(), &catalog());
        assert_eq!(gateway.search(&request).await.unwrap(), hits);
    }

    #[tokio::test]
    async fn test_settings_failure_skips_query() {
        let mock = Arc::new(MockBackend::new().failing_on(FailOn::UpdateSortable));
        let gateway = SearchGateway::new(mock.clone(), catalog());

        let request = normalize(&RawQueryParams::new(), &catalog());
        let err = gateway.search(&request).await.unwrap_err();

        assert_eq!(err.to_string(), "upstream search failure");
        assert!(matches!(err.cause(), Some(BackendError::Api { .. })));
        assert_eq!(mock.calls().len(), 1);
        assert!(mock.last_search().is_none());
    }

    #[tokio::test]
    async fn test_query_failure_is_upstream() {
        let mock = Arc::new(MockBackend::new().failing_on(FailOn::Search));
        let gateway = SearchGateway::new(mock, catalog());

        let request = normalize(&RawQueryParams::new(), &catalog());
        let SearchFailure::Upstream { cause } = gateway.search(&request).await.unwrap_err();
        assert!(cause.unwrap().is_rejection());
    }

    struct StalledBackend;

    #[async_trait]
    impl SearchBackend for StalledBackend {
        async fn update_sortable_attributes(
            &self,
            _fields: &[String],
        ) -> std::result::Result<(), BackendError> {
            std::future::pending().await
        }

        async fn search(
            &self,
            _query: &BackendQuery,
        ) -> std::result::Result<Vec<Document>, BackendError> {
            std::future::pending().await
        }

        async fn add_documents(
            &self,
            _documents: &[Document],
        ) -> std::result::Result<(), BackendError> {
            std::future::pending().await
        }

        fn name(&self) -> &str {
            "stalled"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expiry_is_upstream_timeout() {
        let gateway = SearchGateway::new(Arc::new(StalledBackend), catalog())
            .with_timeout(Duration::from_millis(250));

        let request = normalize(&RawQueryParams::new(), &catalog());
        let err = gateway.search(&request).await.unwrap_err();
        assert!(matches!(err.cause(), Some(BackendError::Timeout(_))));
        assert!(!err.cause().unwrap().is_rejection());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_until_past_deadline() {
        let gateway = SearchGateway::new(Arc::new(StalledBackend), catalog());
        let request = normalize(&RawQueryParams::new(), &catalog());
        let result = gateway.search_until(&request, Instant::now()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_caller_deadline_reports_elapsed_time() {
        let gateway = SearchGateway::new(Arc::new(StalledBackend), catalog());
        let request = normalize(&RawQueryParams::new(), &catalog());

        let deadline = Instant::now() + Duration::from_millis(100);
        let err = gateway.search_until(&request, deadline).await.unwrap_err();
        assert!(matches!(
            err.cause(),
            Some(BackendError::Timeout(elapsed))
                if *elapsed >= Duration::from_millis(100) && *elapsed < DEFAULT_TIMEOUT
        ));
    }
}
