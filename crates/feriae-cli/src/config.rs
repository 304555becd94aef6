//! Feriae configuration.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8000
//! page_size = 50
//!
//! [search]
//! url = "http://localhost:7700"
//! index = "public_holiday"
//! timeout_secs = 5
//!
//! [upstream]
//! base_url = "https://date.nager.at/api/v3"
//! timeout_secs = 10
//! max_attempts = 5
//! retry_delay_ms = 500
//!
//! [store]
//! path = "/var/lib/feriae/holidays.json"
//! ```
//!
//! Every section is optional. Environment variables named
//! `FERIAE_<SECTION>__<KEY>` override file values, e.g.
//! `FERIAE_SEARCH__URL` or `FERIAE_SERVER__PORT`. Empty variables are ignored.

use std::path::PathBuf;

use feriae_api::ServerSettings;
use feriae_core::ConfigManager;
use feriae_ingest::UpstreamSettings;
use feriae_search::SearchSettings;
use serde::{Deserialize, Serialize};

/// Where the record snapshot lives (`[store]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// JSON snapshot file.
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        let path = dirs::data_dir()
            .map(|d| d.join("feriae").join("holidays.json"))
            .unwrap_or_else(|| PathBuf::from("holidays.json"));
        Self { path }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeriaeConfig {
    /// HTTP listener.
    pub server: ServerSettings,
    /// Search backend.
    pub search: SearchSettings,
    /// Upstream holiday API.
    pub upstream: UpstreamSettings,
    /// Record store.
    pub store: StoreSettings,
}

impl ConfigManager for FeriaeConfig {
    fn project_name() -> &'static str {
        "feriae"
    }

    fn config_path_env_var() -> &'static str {
        "FERIAE_CONFIG"
    }

    fn env_prefix() -> &'static str {
        "FERIAE"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use feriae_core::EnvVars;

    fn env(pairs: &[(&str, &str)]) -> Option<EnvVars> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = FeriaeConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.search.index, "public_holiday");
        assert_eq!(config.upstream.max_attempts, 5);
        assert!(config.store.path.ends_with("holidays.json"));
    }

    #[test]
    fn test_file_sections_are_optional() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nurl = \"http://meili:7700\"\n").unwrap();

        let config = FeriaeConfig::load_with_env(Some(path.to_str().unwrap()), env(&[])).unwrap();
        assert_eq!(config.search.url, "http://meili:7700");
        assert_eq!(config.search.timeout_secs, 5);
        assert_eq!(config.server, ServerSettings::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8000\npage_size = 20\n").unwrap();

        let vars = env(&[
            ("FERIAE_SERVER__PORT", "9000"),
            ("FERIAE_SEARCH__URL", "http://search:7700"),
            ("FERIAE_SEARCH__API_KEY", "secret"),
            ("FERIAE_STORE__PATH", "/tmp/h.json"),
            ("FERIAE_CONFIG", "/ignored.toml"),
        ]);
        let config = FeriaeConfig::load_with_env(Some(path.to_str().unwrap()), vars).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.page_size, 20);
        assert_eq!(config.search.url, "http://search:7700");
        assert_eq!(config.search.api_key.as_deref(), Some("secret"));
        assert_eq!(config.store.path, PathBuf::from("/tmp/h.json"));
    }

    #[test]
    fn test_invalid_port_override() {
        let vars = env(&[("FERIAE_SERVER__PORT", "eighty")]);
        let err = FeriaeConfig::load_with_env(Some("/nonexistent/feriae.toml"), vars).unwrap_err();
        assert!(err.to_string().contains("eighty"));
    }

    #[test]
    fn test_exported_env_vars_load_back() {
        let mut original = FeriaeConfig::default();
        original.server.port = 8123;
        original.search.api_key = Some("k".to_string());
        original.upstream.max_attempts = 2;

        let vars = original.to_env_vars().unwrap();
        assert!(vars.contains(&("FERIAE_UPSTREAM__MAX_ATTEMPTS".to_string(), "2".to_string())));

        let env = Some(vars.into_iter().collect());
        let rebuilt = FeriaeConfig::load_with_env(Some("/nonexistent/feriae.toml"), env).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = FeriaeConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed: FeriaeConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
