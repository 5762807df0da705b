//! Brave web search client

use super::models::SearchResultSet;
use crate::config::{ConfigError, SearchSettings};
use crate::network::{ApiRequest, HttpClient};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Search request failures
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Search failed with status code: {0}")]
    Status(u16),
    #[error("Could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the Brave Search web endpoint
pub struct BraveSearch {
    client: HttpClient,
    endpoint: Url,
    api_key: String,
    count: u32,
}

impl BraveSearch {
    /// Create a search client from settings and the subscription token
    pub fn new(
        client: HttpClient,
        settings: &SearchSettings,
        api_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(&settings.endpoint).map_err(|source| ConfigError::InvalidUrl {
            field: "search",
            value: settings.endpoint.clone(),
            source,
        })?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            count: settings.count,
        })
    }

    /// Default number of results per query
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Search with the configured result count
    pub async fn search(&self, query: &str) -> Result<SearchResultSet, SearchError> {
        self.search_with_count(query, self.count).await
    }

    /// Issue exactly one search request. Only HTTP 200 counts as success.
    pub async fn search_with_count(
        &self,
        query: &str,
        count: u32,
    ) -> Result<SearchResultSet, SearchError> {
        let request = ApiRequest::get(self.endpoint.as_str())
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .param("q", query)
            .param("count", count.to_string());

        debug!(query, count, "Searching");
        let response = self.client.execute(request).await?;

        if response.status != 200 {
            return Err(SearchError::Status(response.status));
        }

        let results: SearchResultSet = response.json()?;
        debug!(results = results.items().len(), "Search complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn brave(server: &MockServer) -> BraveSearch {
        let settings = SearchSettings {
            endpoint: format!("{}/res/v1/web/search", server.uri()),
            ..Default::default()
        };
        BraveSearch::new(HttpClient::new().unwrap(), &settings, "test-token").unwrap()
    }

    #[test]
    fn test_invalid_endpoint() {
        let settings = SearchSettings {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        let result = BraveSearch::new(HttpClient::new().unwrap(), &settings, "k");
        assert!(matches!(result, Err(ConfigError::InvalidUrl { field: "search", .. })));
    }

    #[tokio::test]
    async fn test_search_request_contract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/res/v1/web/search"))
            .and(header("X-Subscription-Token", "test-token"))
            .and(header("Accept", "application/json"))
            .and(query_param("q", "rust async"))
            .and(query_param("count", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "web": { "results": [
                    { "title": "Tokio", "description": "runtime", "url": "https://tokio.rs" }
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = brave(&server).search("rust async").await.unwrap();
        assert_eq!(results.items().len(), 1);
        assert_eq!(results.items()[0].url, "https://tokio.rs");
    }

    #[tokio::test]
    async fn test_custom_count() {
        let server = MockServer::start().await;
        Mock::given(query_param("count", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let results = brave(&server).search_with_count("q", 3).await.unwrap();
        assert!(results.web.is_none());
    }

    #[tokio::test]
    async fn test_non_200_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let err = brave(&server).search("q").await.unwrap_err();
        assert!(matches!(err, SearchError::Status(429)));
        assert_eq!(err.to_string(), "Search failed with status code: 429");
    }

    #[tokio::test]
    async fn test_other_2xx_is_not_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(202).set_body_string("{}"))
            .mount(&server)
            .await;

        let err = brave(&server).search("q").await.unwrap_err();
        assert!(matches!(err, SearchError::Status(202)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = brave(&server).search("q").await.unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_empty_query_still_searches() {
        let server = MockServer::start().await;
        Mock::given(query_param("q", ""))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        assert!(brave(&server).search("").await.is_ok());
    }
}
