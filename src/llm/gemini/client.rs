//! Gemini client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

use crate::llm::core::{
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::GenerateRequest,
};

use super::mapper::{from_gemini_response, to_gemini_request};
use super::sse::parse_sse_stream;
use super::types::ErrorEnvelope;

/// Public Generative Language API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini model identifiers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeminiModel {
    /// Gemini 2.5 Pro
    Gemini25Pro,
    /// Gemini 2.5 Flash
    #[default]
    Gemini25Flash,
    /// Gemini 2.5 Flash Lite
    Gemini25FlashLite,
    /// Any other model id accepted by the API
    Custom(String),
}

impl GeminiModel {
    /// Get the model identifier string
    pub fn as_str(&self) -> &str {
        match self {
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
            GeminiModel::Gemini25FlashLite => "gemini-2.5-flash-lite",
            GeminiModel::Custom(id) => id,
        }
    }
}

impl FromStr for GeminiModel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "gemini-2.5-pro" => GeminiModel::Gemini25Pro,
            "gemini-2.5-flash" => GeminiModel::Gemini25Flash,
            "gemini-2.5-flash-lite" => GeminiModel::Gemini25FlashLite,
            other => GeminiModel::Custom(other.to_string()),
        })
    }
}

/// Client for Gemini models on the Generative Language API
pub struct GeminiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// API key sent in the `x-goog-api-key` header
    api_key: String,
    /// Scheme and host, without a trailing slash
    base_url: String,
    /// Model to use
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: GeminiModel) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::Connection(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// Point the client at a different host (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the endpoint URL for streaming
    fn build_endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url,
            self.model.as_str()
        )
    }

    /// Make a streaming request to Gemini
    #[tracing::instrument(skip_all, fields(model = %self.model.as_str()))]
    async fn make_streaming_request(
        &self,
        request: GenerateRequest,
    ) -> Result<EventStream, LlmError> {
        let gemini_request = to_gemini_request(request);
        tracing::debug!(
            contents = gemini_request.contents.len(),
            tools = gemini_request.tools.as_ref().map_or(0, |t| t[0].function_declarations.len()),
            "sending generate request"
        );

        let url = self.build_endpoint_url();
        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "gemini request rejected");
            return Err(map_error_response(status, retry_after, body));
        }

        // Each chunk can carry several parts; flatten them into single events
        let events = parse_sse_stream(response.bytes_stream()).flat_map(|chunk| {
            futures::stream::iter(match chunk {
                Ok(response) => from_gemini_response(response)
                    .into_iter()
                    .map(Ok)
                    .collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            })
        });

        Ok(Box::pin(events))
    }
}

/// Translate a non-2xx response into the most specific error kind
fn map_error_response(status: StatusCode, retry_after: Option<Duration>, body: String) -> LlmError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return LlmError::RateLimited { retry_after };
    }

    let detail = serde_json::from_str::<ErrorEnvelope>(&body).ok().map(|e| e.error);

    match (status, detail) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, detail) => {
            LlmError::Authentication(detail.map(|d| d.message).unwrap_or(body))
        }
        // The API reports a bad key as 400 INVALID_ARGUMENT
        (_, Some(detail)) if detail.message.contains("API key") => {
            LlmError::Authentication(detail.message)
        }
        (_, Some(detail)) if !detail.status.is_empty() => LlmError::Api {
            status: detail.status,
            message: detail.message,
        },
        _ => LlmError::Http {
            status: status.as_u16(),
            body,
        },
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        self.make_streaming_request(request).await
    }
}
