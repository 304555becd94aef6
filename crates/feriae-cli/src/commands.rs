//! Command implementations.

use std::sync::Arc;

use feriae_api::{AppState, Server};
use feriae_core::{FieldCatalog, HolidayStore};
use feriae_ingest::{IngestRequest, NagerClient, populate_models};
use feriae_search::{MeilisearchBackend, PopulateOutcome, SearchBackend, SearchGateway, populate};

use crate::config::FeriaeConfig;
use crate::error::Result;

/// `serve`: load the store snapshot and run the API until Ctrl-C.
pub async fn serve(config: &FeriaeConfig) -> Result<()> {
    let store = HolidayStore::load(&config.store.path)?;
    let backend = MeilisearchBackend::new(&config.search)?;
    let gateway = SearchGateway::new(Arc::new(backend), FieldCatalog::holidays().clone())
        .with_timeout(config.search.timeout());

    let state = AppState::new(store, gateway);
    Server::new(config.server.clone(), state).run().await?;
    Ok(())
}

/// `populate-models`: fetch holidays upstream and store the new ones.
pub async fn ingest(config: &FeriaeConfig, request: IngestRequest) -> Result<String> {
    let client = NagerClient::new(&config.upstream)?;
    let report = populate_models(&client, &config.upstream, &config.store.path, &request).await?;
    Ok(report.to_string())
}

/// `populate-index`: submit every stored record to the configured index.
pub async fn populate_index(config: &FeriaeConfig) -> Result<String> {
    let backend = MeilisearchBackend::new(&config.search)?;
    populate_index_with(config, &backend).await
}

/// `populate-index` against any backend.
pub async fn populate_index_with(
    config: &FeriaeConfig,
    backend: &dyn SearchBackend,
) -> Result<String> {
    let store = HolidayStore::load(&config.store.path)?;
    let message = match populate(&store, backend).await? {
        PopulateOutcome::Populated { count } => format!(
            "Successfully populated \"{}\" index with {count} documents.",
            config.search.index
        ),
        PopulateOutcome::Empty => "No models found in your database".to_string(),
    };
    Ok(message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use feriae_core::NewHoliday;
    use feriae_search::{FailOn, MockBackend};
    use tempfile::TempDir;

    fn config_with_store(dir: &TempDir, records: u32) -> FeriaeConfig {
        let mut config = FeriaeConfig::default();
        config.store.path = dir.path().join("holidays.json");

        let mut store = HolidayStore::new();
        store.insert_new((1..=records).map(|d| NewHoliday {
            country: "PA".to_string(),
            name: format!("Holiday {d}"),
            local_name: format!("Feriado {d}"),
            date: NaiveDate::from_ymd_opt(2023, 3, d).unwrap(),
        }));
        store.save(&config.store.path).unwrap();
        config
    }

    #[tokio::test]
    async fn test_populate_index_message() {
        let dir = TempDir::new().unwrap();
        let config = config_with_store(&dir, 2);
        let backend = MockBackend::new();

        let message = populate_index_with(&config, &backend).await.unwrap();
        assert_eq!(
            message,
            "Successfully populated \"public_holiday\" index with 2 documents."
        );
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_populate_index_empty_store() {
        let dir = TempDir::new().unwrap();
        let config = config_with_store(&dir, 0);
        let backend = MockBackend::new();

        let message = populate_index_with(&config, &backend).await.unwrap();
        assert_eq!(message, "No models found in your database");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_populate_index_backend_error() {
        let dir = TempDir::new().unwrap();
        let config = config_with_store(&dir, 2);
        let backend = MockBackend::new().failing_on(FailOn::AddDocuments);

        let err = populate_index_with(&config, &backend).await.unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Error connecting to MeiliSearch: ")
        );
    }
}
