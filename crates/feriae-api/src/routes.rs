//! HTTP routes.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/public_holiday/` | paginated listing, ordered by id |
//! | GET | `/public_holiday/search/` | search through the gateway |
//! | GET | `/public_holiday/{id}/` | one record |
//! | GET | `/healthz` | liveness and record count |

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::http::header::HOST;
use axum::routing::get;
use axum::{Json, Router};
use feriae_core::PublicHoliday;
use feriae_search::{Document, RawQueryParams, normalize};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

const LIST_PATH: &str = "/public_holiday/";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::<AppState>::new()
        .route(LIST_PATH, get(list))
        .route("/public_holiday/search/", get(search))
        .route("/public_holiday/{id}/", get(detail))
        .route("/healthz", get(healthz))
        .with_state(state)
}

// ============================================================================
// Listing
// ============================================================================

/// One page of the listing.
#[derive(Debug, Serialize)]
pub struct Page<'a> {
    /// Total number of records.
    pub count: usize,
    /// Link to the next page, if any.
    pub next: Option<String>,
    /// Link to the previous page, if any.
    pub previous: Option<String>,
    /// Records on this page.
    pub results: Vec<&'a PublicHoliday>,
}

/// Resolve the `page` parameter to a 1-based page number.
///
/// Accepts a positive integer or `last`. An empty catalog still has page 1.
fn resolve_page(raw: Option<&str>, count: usize, page_size: usize) -> Result<usize, ApiError> {
    let num_pages = count.div_ceil(page_size).max(1);
    let page = match raw {
        None => 1,
        Some("last") => num_pages,
        Some(raw) => raw.parse::<usize>().map_err(|_| ApiError::InvalidPage)?,
    };
    if page == 0 || page > num_pages {
        return Err(ApiError::InvalidPage);
    }
    Ok(page)
}

fn page_link(base: &str, page: usize) -> String {
    if page == 1 {
        base.to_string()
    } else {
        format!("{base}?page={page}")
    }
}

async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let raw = params
        .iter()
        .rev()
        .find(|(name, _)| name == "page")
        .map(|(_, value)| value.as_str());

    let store = state.store();
    let page_size = state.page_size();
    let page = resolve_page(raw, store.len(), page_size)?;
    let num_pages = store.len().div_ceil(page_size).max(1);

    let base = match headers.get(HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{host}{LIST_PATH}"),
        None => LIST_PATH.to_string(),
    };

    let body = Page {
        count: store.len(),
        next: (page < num_pages).then(|| page_link(&base, page + 1)),
        previous: (page > 1).then(|| page_link(&base, page - 1)),
        results: store.page((page - 1) * page_size, page_size),
    };
    Ok(Json(json!(body)))
}

async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PublicHoliday>, ApiError> {
    let id: u64 = id.parse().map_err(|_| ApiError::NotFound)?;
    state
        .store()
        .get(id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// ============================================================================
// Search
// ============================================================================

async fn search(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let raw: RawQueryParams = params.into_iter().collect();
    let request = normalize(&raw, state.catalog());
    tracing::debug!(
        term = %request.term,
        sort = %request.sort,
        fields = ?request.projection.attributes(),
        "normalized search request"
    );

    let hits = state.gateway().search(&request).await?;
    Ok(Json(hits))
}

// ============================================================================
// Health
// ============================================================================

async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "records": state.store().len(),
    }))
}
