//! Meilisearch backend over the REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, BackendQuery, Document, SearchBackend};

/// Connection settings for the search backend (`[search]` config section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the Meilisearch instance.
    pub url: String,
    /// API key sent as a bearer token, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Index holding the holiday documents.
    pub index: String,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:7700".to_string(),
            api_key: None,
            index: "public_holiday".to_string(),
            timeout_secs: 5,
        }
    }
}

impl SearchSettings {
    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Error body returned by Meilisearch on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    code: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Document>,
}

/// [`SearchBackend`] talking to one Meilisearch index.
#[derive(Debug, Clone)]
pub struct MeilisearchBackend {
    client: reqwest::Client,
    base_url: String,
    index: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl MeilisearchBackend {
    /// Build a backend from settings.
    pub fn new(settings: &SearchSettings) -> Result<Self, BackendError> {
        let timeout = settings.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                BackendError::communication_with_source("failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            index: settings.index.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
            timeout,
        })
    }

    /// Index name.
    pub fn index(&self) -> &str {
        &self.index
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/indexes/{}/{}", self.base_url, self.index, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, BackendError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => BackendError::Api {
                status: status.as_u16(),
                code: body.code,
                message: body.message,
            },
            Err(_) => BackendError::Api {
                status: status.as_u16(),
                code: String::new(),
                message: text,
            },
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::communication_with_source(
                format!("request to {} failed", self.base_url),
                e,
            )
        }
    }
}

#[async_trait]
impl SearchBackend for MeilisearchBackend {
    async fn update_sortable_attributes(&self, fields: &[String]) -> Result<(), BackendError> {
        let request = self
            .client
            .put(self.endpoint("settings/sortable-attributes"))
            .json(fields);
        self.send(request).await?;
        tracing::debug!(index = %self.index, ?fields, "declared sortable attributes");
        Ok(())
    }

    async fn search(&self, query: &BackendQuery) -> Result<Vec<Document>, BackendError> {
        let request = self.client.post(self.endpoint("search")).json(query);
        let response = self.send(request).await?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(body.hits)
    }

    async fn add_documents(&self, documents: &[Document]) -> Result<(), BackendError> {
        let request = self
            .client
            .post(self.endpoint("documents?primaryKey=id"))
            .json(documents);
        self.send(request).await?;
        tracing::debug!(index = %self.index, count = documents.len(), "submitted documents");
        Ok(())
    }

    fn name(&self) -> &str {
        "meilisearch"
    }
}
