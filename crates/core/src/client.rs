//! Blocking HTTP client for the remote medicine search endpoint.
//!
//! One request per user-triggered search, no retries and no concurrent
//! requests. The caller owns what happens to the suggestions.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::{SaltSuggestion, SearchEnvelope};
use crate::SearchConfig;

/// Path of the search endpoint, relative to the configured base URL.
pub const SEARCH_PATH: &str = "/api/v1/new_search";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search endpoint returned {status}")]
    Status { status: StatusCode },
    #[error("unexpected search response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for the `new_search` endpoint.
pub struct SearchClient {
    config: SearchConfig,
    http: Client,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("medsearch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    /// Run one search for a medicine name and return the raw suggestions.
    ///
    /// Non-2xx statuses and undecodable bodies are errors; an empty suggestion
    /// list is a valid result the caller decides how to present.
    pub fn search(&self, query: &str) -> Result<Vec<SaltSuggestion>, ClientError> {
        let url = self.search_url();
        debug!(url = %url, query, "Issuing search request");

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("pharmacyIds", &self.config.pharmacy_ids_param())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Search endpoint returned an error status");
            return Err(ClientError::Status { status });
        }

        let envelope: SearchEnvelope = response.json().map_err(ClientError::Decode)?;
        let suggestions = envelope.data.salt_suggestions;
        info!(query, count = suggestions.len(), "Search completed");
        Ok(suggestions)
    }

    fn search_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), SEARCH_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_joins_base_and_path() {
        let client = SearchClient::new(SearchConfig {
            base_url: "https://backend.example.com".into(),
            ..SearchConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.search_url(),
            "https://backend.example.com/api/v1/new_search"
        );
    }

    #[test]
    fn search_url_tolerates_trailing_slash() {
        let client = SearchClient::new(SearchConfig {
            base_url: "https://backend.example.com/".into(),
            ..SearchConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.search_url(),
            "https://backend.example.com/api/v1/new_search"
        );
    }
}
