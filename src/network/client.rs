//! HTTP client for making requests to provider APIs

use super::request::{ApiRequest, ApiResponse, HttpMethod};
use crate::config::OutgoingSettings;
use reqwest::{Client, Response};
use tracing::debug;

/// HTTP client wrapper shared by the search and chat clients
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> reqwest::Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> reqwest::Result<Self> {
        let mut builder = Client::builder().gzip(true).brotli(true);

        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: format!("brave-agent/{}", crate::VERSION),
        })
    }

    /// Execute an API request
    pub async fn execute(&self, request: ApiRequest) -> reqwest::Result<ApiResponse> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder.header("User-Agent", &self.user_agent);

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.json(&body);
        }

        debug!(method = ?request.method, url = %request.url, "Sending request");
        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into ApiResponse
    async fn parse_response(response: Response) -> reqwest::Result<ApiResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!(status, bytes = text.len(), "Received response");

        Ok(ApiResponse { status, text })
    }
}
