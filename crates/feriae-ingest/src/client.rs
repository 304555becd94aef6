//! Nager.Date v3 client.

use std::time::Duration;

use chrono::NaiveDate;
use feriae_core::NewHoliday;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Upstream API settings (`[upstream]` config section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Base URL, up to and including the API version.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Attempts made while the API answers `204 No Content`.
    pub max_attempts: usize,
    /// Initial delay between attempts, in milliseconds. Doubles each time.
    pub retry_delay_ms: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: "https://date.nager.at/api/v3".to_string(),
            timeout_secs: 10,
            max_attempts: 5,
            retry_delay_ms: 500,
        }
    }
}

/// A country offered by the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// ISO 3166-1 alpha-2 code.
    pub country_code: String,
    /// English name.
    pub name: String,
}

/// One holiday as served upstream. Extra fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamHoliday {
    date: NaiveDate,
    local_name: String,
    name: String,
    country_code: String,
}

impl From<UpstreamHoliday> for NewHoliday {
    fn from(h: UpstreamHoliday) -> Self {
        NewHoliday {
            country: h.country_code,
            name: h.name,
            local_name: h.local_name,
            date: h.date,
        }
    }
}

/// HTTP client for the public holiday API.
#[derive(Debug, Clone)]
pub struct NagerClient {
    client: reqwest::Client,
    base_url: String,
}

impl NagerClient {
    /// Build a client from settings.
    pub fn new(settings: &UpstreamSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(IngestError::fetch)?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Countries the API has data for.
    pub async fn available_countries(&self) -> Result<Vec<Country>> {
        let url = format!("{}/AvailableCountries", self.base_url);
        let response = self.client.get(&url).send().await.map_err(IngestError::fetch)?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status { status });
        }
        response.json().await.map_err(IngestError::fetch)
    }

    /// Holidays of `country` in `year`.
    ///
    /// Returns `None` when the API answers `204 No Content`.
    pub async fn public_holidays(
        &self,
        year: i32,
        country: &str,
    ) -> Result<Option<Vec<NewHoliday>>> {
        let url = format!("{}/PublicHolidays/{year}/{country}", self.base_url);
        tracing::debug!(%url, "fetching public holidays");

        let response = self.client.get(&url).send().await.map_err(IngestError::fetch)?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IngestError::Status { status });
        }

        let holidays: Vec<UpstreamHoliday> = response.json().await.map_err(IngestError::fetch)?;
        Ok(Some(holidays.into_iter().map(NewHoliday::from).collect()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_holiday_decodes_and_converts() {
        let json = r#"{
            "date": "2023-11-03",
            "localName": "Separación de Panamá de Colombia",
            "name": "Separation Day",
            "countryCode": "PA",
            "fixed": true,
            "global": true,
            "counties": null,
            "launchYear": null,
            "types": ["Public"]
        }"#;
        let upstream: UpstreamHoliday = serde_json::from_str(json).unwrap();
        let holiday = NewHoliday::from(upstream);
        assert_eq!(holiday.country, "PA");
        assert_eq!(holiday.name, "Separation Day");
        assert_eq!(holiday.local_name, "Separación de Panamá de Colombia");
        assert_eq!(holiday.date, NaiveDate::from_ymd_opt(2023, 11, 3).unwrap());
    }

    #[test]
    fn test_country_decodes() {
        let countries: Vec<Country> =
            serde_json::from_str(r#"[{"countryCode": "AD", "name": "Andorra"}]"#).unwrap();
        assert_eq!(countries[0].country_code, "AD");
        assert_eq!(countries[0].name, "Andorra");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = UpstreamSettings::default();
        assert_eq!(settings.base_url, "https://date.nager.at/api/v3");
        assert_eq!(settings.max_attempts, 5);
    }

    #[test]
    fn test_settings_partial_toml() {
        let settings: UpstreamSettings = toml::from_str("max_attempts = 2").unwrap();
        assert_eq!(settings.max_attempts, 2);
        assert_eq!(settings.timeout_secs, 10);
    }
}
