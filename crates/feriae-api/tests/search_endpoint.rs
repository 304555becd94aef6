//! Search endpoint behaviour against a recording backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use feriae_api::{AppState, router};
use feriae_core::{FieldCatalog, HolidayStore};
use feriae_search::{BackendCall, BackendQuery, Document, FailOn, MockBackend, SearchGateway};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(backend: Arc<MockBackend>) -> axum::Router {
    let gateway = SearchGateway::new(backend, FieldCatalog::holidays().clone());
    router(AppState::new(HolidayStore::new(), gateway))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_search_full_query() {
    let backend = Arc::new(MockBackend::new());
    let uri = concat!(
        "/public_holiday/search/?q=query&sort=country",
        "&fields=country&fields=name&fields=country&fields=name"
    );
    let (status, body) = get(app(backend.clone()), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let query = backend.last_search().unwrap();
    assert_eq!(query.q, "query");
    assert_eq!(query.sort, strings(&["country:asc"]));
    assert_eq!(query.attributes_to_retrieve, strings(&["country", "name"]));
}

#[tokio::test]
async fn test_search_invalid_sort_falls_back() {
    let backend = Arc::new(MockBackend::new());
    let (status, _) = get(app(backend.clone()), "/public_holiday/search/?sort=-pizza").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(backend.last_search().unwrap().sort, strings(&["id:asc"]));
}

#[tokio::test]
async fn test_search_descending_sort() {
    let backend = Arc::new(MockBackend::new());
    get(app(backend.clone()), "/public_holiday/search/?sort=-date").await;
    assert_eq!(backend.last_search().unwrap().sort, strings(&["date:desc"]));
}

#[tokio::test]
async fn test_search_invalid_fields_fall_back_to_wildcard() {
    let backend = Arc::new(MockBackend::new());
    let (status, _) = get(
        app(backend.clone()),
        "/public_holiday/search/?fields=invalid_field",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        backend.last_search().unwrap().attributes_to_retrieve,
        strings(&["*"])
    );
}

#[tokio::test]
async fn test_search_partially_invalid_fields_fall_back_to_wildcard() {
    let backend = Arc::new(MockBackend::new());
    get(
        app(backend.clone()),
        "/public_holiday/search/?fields=country&fields=pizza",
    )
    .await;
    assert_eq!(
        backend.last_search().unwrap().attributes_to_retrieve,
        strings(&["*"])
    );
}

#[tokio::test]
async fn test_search_without_params_uses_defaults() {
    let backend = Arc::new(MockBackend::new());
    let (status, _) = get(app(backend.clone()), "/public_holiday/search/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        backend.calls(),
        vec![
            BackendCall::UpdateSortable(FieldCatalog::holidays().fields().to_vec()),
            BackendCall::Search(BackendQuery {
                q: String::new(),
                sort: strings(&["id:asc"]),
                attributes_to_retrieve: strings(&["*"]),
            }),
        ]
    );
}

#[tokio::test]
async fn test_search_returns_hits_unmodified() {
    let mut first = Document::new();
    first.insert("id".into(), "12".into());
    first.insert("name".into(), "Labour Day".into());
    let mut second = Document::new();
    second.insert("id".into(), "3".into());
    second.insert("_formatted".into(), json!({"name": "<em>Labour</em>"}));

    let backend = Arc::new(MockBackend::with_hits(vec![first, second]));
    let (status, body) = get(app(backend), "/public_holiday/search/?q=labour").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": "12", "name": "Labour Day"},
            {"id": "3", "_formatted": {"name": "<em>Labour</em>"}}
        ])
    );
}

#[tokio::test]
async fn test_search_settings_failure_is_500() {
    let backend = Arc::new(MockBackend::new().failing_on(FailOn::UpdateSortable));
    let (status, body) = get(app(backend.clone()), "/public_holiday/search/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"detail": "Error while fetching data from meilisarch"})
    );
    assert!(backend.last_search().is_none());
}

#[tokio::test]
async fn test_search_query_failure_is_500() {
    let backend = Arc::new(MockBackend::new().failing_on(FailOn::Search));
    let (status, body) = get(app(backend), "/public_holiday/search/?q=x").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"detail": "Error while fetching data from meilisarch"})
    );
}
