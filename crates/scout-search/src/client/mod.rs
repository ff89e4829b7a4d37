//! API mode: registry search over HTTP

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use scout_core::error::{ScoutError, ScoutResult};
use scout_core::types::{RegistryInfo, SearchOptions, SearchResult};
use tracing::{error, info};
use url::Url;

use crate::api::ApiSearchResponse;
use crate::normalize;
use crate::service::SearchBackend;

/// HTTP client for a registry's `/-/v1/search` endpoint
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Full search endpoint, e.g. `https://registry.npmjs.org/-/v1/search`
    search_url: Url,
}

impl RegistryClient {
    /// Create a client for a search endpoint
    pub fn new(search_url: &str) -> ScoutResult<Self> {
        Self::with_user_agent(search_url, concat!("scout/", env!("CARGO_PKG_VERSION")))
    }

    /// Create a client that identifies itself with `user_agent`
    pub fn with_user_agent(search_url: &str, user_agent: &str) -> ScoutResult<Self> {
        let search_url = Url::parse(search_url).map_err(|e| ScoutError::ConfigValidation {
            field: "registry".to_string(),
            reason: format!("'{}' is not a valid URL: {}", search_url, e),
        })?;

        let client = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            .gzip(true)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ScoutError::network(format!("Failed to create HTTP client: {}", e), e))?;

        Ok(Self { client, search_url })
    }

    /// Search endpoint this client queries
    pub fn search_url(&self) -> &str {
        self.search_url.as_str()
    }

    /// Build `{search_url}?text=..&size=..&from=..`
    fn request_url(&self, query: &str, options: &SearchOptions) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("text", query)
            .append_pair("size", &options.limit.to_string())
            .append_pair("from", &options.offset.to_string());
        url
    }

    /// Run one search against the registry
    pub async fn search(&self, query: &str, options: &SearchOptions) -> ScoutResult<SearchResult> {
        info!("Searching npm packages with API: {}", query);

        let result = self.fetch(query, options).await;
        if let Err(err) = &result {
            error!("Error searching npm packages with API: {}: {}", query, err);
        }
        result
    }

    async fn fetch(&self, query: &str, options: &SearchOptions) -> ScoutResult<SearchResult> {
        let response = self
            .client
            .get(self.request_url(query, options))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ScoutError::network(format!("Failed to reach registry: {}", e), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .json::<ApiSearchResponse>()
            .await
            .map_err(|e| ScoutError::InvalidResponse {
                message: format!("Failed to parse search response: {}", e),
            })?;

        let packages: Vec<_> = body
            .objects
            .unwrap_or_default()
            .into_iter()
            .filter_map(normalize::from_api_value)
            .collect();

        info!("Found {} packages for query: {}", packages.len(), query);

        Ok(SearchResult::new(packages, body.total.unwrap_or(0)))
    }
}

#[async_trait]
impl SearchBackend for RegistryClient {
    fn registry_info(&self) -> RegistryInfo {
        RegistryInfo::Endpoint(self.search_url.to_string())
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> ScoutResult<SearchResult> {
        RegistryClient::search(self, query, options).await
    }
}
