//! Minimal HTTP client for the search index `_search` endpoint.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::SearchIndexConfig;
use crate::search_index::models::SearchResponse;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search index request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search index returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("search index response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct SearchIndexClient {
    http: reqwest::Client,
    search_url: String,
    credentials: Option<(String, Option<String>)>,
}

impl SearchIndexClient {
    pub fn new(config: &SearchIndexConfig) -> crate::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                crate::Error::Internal(format!("Failed to build search index client: {e}"))
            })?;

        let search_url = format!(
            "{}/{}/_search",
            config.url.trim_end_matches('/'),
            urlencoding::encode(&config.index)
        );

        Ok(Self {
            http,
            search_url,
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Run a `_search` request and decode hits of type `T`.
    pub async fn search<T: DeserializeOwned>(
        &self,
        body: &Value,
    ) -> Result<SearchResponse<T>, SearchError> {
        let mut request = self.http.post(&self.search_url).json(body);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, password.as_deref());
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
