//! Chat completion clients

use super::RefineError;
use crate::config::{ConfigError, RefinerSettings};
use crate::network::{ApiRequest, HttpClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Sends a system instruction plus a user prompt to an LLM and returns the
/// assistant's text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Model identifier used for completions
    fn model(&self) -> &str;

    /// Run one completion. No retries.
    async fn complete(&self, system: &str, user: &str) -> Result<String, RefineError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client
pub struct OpenAiChat {
    client: HttpClient,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(
        client: HttpClient,
        settings: &RefinerSettings,
        api_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let endpoint = format!("{}/chat/completions", settings.base_url.trim_end_matches('/'));
        Url::parse(&endpoint).map_err(|source| ConfigError::InvalidUrl {
            field: "refiner",
            value: settings.base_url.clone(),
            source,
        })?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            model: settings.model.clone(),
        })
    }

    /// Full completions URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatClient for OpenAiChat {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, RefineError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| RefineError::Malformed(e.to_string()))?;

        let request = ApiRequest::post(&self.endpoint)
            .bearer(&self.api_key)
            .json(body);

        debug!(model = %self.model, "Requesting chat completion");
        let response = self.client.execute(request).await?;

        if !response.is_success() {
            return Err(RefineError::Status(response.status));
        }

        let completion: ChatCompletion = response
            .json()
            .map_err(|e| RefineError::Malformed(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| RefineError::Malformed("completion has no content".to_string()))
    }
}
