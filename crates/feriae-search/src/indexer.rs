//! Index population: stored records to search documents.

use feriae_core::{HolidayStore, PublicHoliday};
use serde_json::Value;

use crate::backend::{BackendError, Document, SearchBackend};

/// Outcome of [`populate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateOutcome {
    /// Every record was submitted in one batch.
    Populated {
        /// Number of documents submitted.
        count: usize,
    },
    /// The store was empty; nothing was sent.
    Empty,
}

/// Render one record as a search document.
///
/// The id is sent as a string; the date in ISO `YYYY-MM-DD` form.
pub fn to_document(record: &PublicHoliday) -> Document {
    let mut doc = Document::new();
    doc.insert("id".into(), Value::String(record.id.to_string()));
    doc.insert("country".into(), Value::String(record.country.clone()));
    doc.insert("name".into(), Value::String(record.name.clone()));
    doc.insert("local_name".into(), Value::String(record.local_name.clone()));
    doc.insert(
        "date".into(),
        Value::String(record.date.format("%Y-%m-%d").to_string()),
    );
    doc
}

/// Submit every stored record to `backend` in a single batch.
pub async fn populate(
    store: &HolidayStore,
    backend: &dyn SearchBackend,
) -> Result<PopulateOutcome, BackendError> {
    if store.is_empty() {
        tracing::warn!("No records in store, index left untouched");
        return Ok(PopulateOutcome::Empty);
    }

    let documents: Vec<Document> = store.iter().map(to_document).collect();
    backend.add_documents(&documents).await?;

    tracing::info!(
        backend = backend.name(),
        count = documents.len(),
        "index populated"
    );
    Ok(PopulateOutcome::Populated {
        count: documents.len(),
    })
}
