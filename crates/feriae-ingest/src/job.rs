//! The `populate-models` job.
//!
//! Picks a country (the requested one, or a random one per attempt), fetches
//! its holidays for a year, and stores the ones not already present. The API
//! sometimes answers `204 No Content`; those attempts are retried with
//! exponential backoff up to `max_attempts`. The store file is only written
//! after a successful fetch.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use chrono::Datelike;
use feriae_core::{HolidayStore, NewHoliday};
use rand::seq::SliceRandom;

use crate::client::{Country, NagerClient, UpstreamSettings};
use crate::error::{IngestError, Result};

/// What to ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestRequest {
    /// Country code; random when `None`.
    pub country: Option<String>,
    /// Year; the current year when `None`.
    pub year: Option<i32>,
}

/// Result of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Country the data came from.
    pub country: Country,
    /// Year fetched.
    pub year: i32,
    /// Records received from upstream.
    pub fetched: usize,
    /// Records newly stored.
    pub inserted: usize,
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully populate data for country {}, {} record processed",
            self.country.name, self.fetched
        )
    }
}

/// Fetch holidays, retrying while the API has no content.
pub async fn fetch_holidays(
    client: &NagerClient,
    settings: &UpstreamSettings,
    request: &IngestRequest,
) -> Result<(Country, i32, Vec<NewHoliday>)> {
    let year = request.year.unwrap_or_else(|| chrono::Utc::now().year());

    let candidates = match &request.country {
        Some(code) => vec![Country {
            country_code: code.to_uppercase(),
            name: code.to_uppercase(),
        }],
        None => client.available_countries().await?,
    };
    if candidates.is_empty() {
        return Err(IngestError::NoCountries);
    }

    let attempts = AtomicUsize::new(0);
    let attempt = || async {
        let n = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let country = candidates
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(IngestError::NoCountries)?;

        match client.public_holidays(year, &country.country_code).await? {
            Some(holidays) => Ok((country, holidays)),
            None => Err(IngestError::NoContent { attempts: n }),
        }
    };

    let backoff = ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(settings.retry_delay_ms))
        .with_max_times(settings.max_attempts.saturating_sub(1));

    let (country, holidays) = attempt
        .retry(backoff)
        .when(IngestError::is_retryable)
        .notify(|err, delay| {
            tracing::warn!(error = %err, ?delay, "upstream returned no content, retrying");
        })
        .await?;

    Ok((country, year, holidays))
}

/// Fetch holidays and add the new ones to the store at `store_path`.
pub async fn populate_models(
    client: &NagerClient,
    settings: &UpstreamSettings,
    store_path: &Path,
    request: &IngestRequest,
) -> Result<IngestReport> {
    let mut store = HolidayStore::load(store_path)?;
    let (country, year, holidays) = fetch_holidays(client, settings, request).await?;

    let fetched = holidays.len();
    let inserted = store.insert_new(holidays);
    store.save(store_path)?;

    tracing::info!(
        country = %country.country_code,
        year,
        fetched,
        inserted,
        "public holidays ingested"
    );
    Ok(IngestReport {
        country,
        year,
        fetched,
        inserted,
    })
}
