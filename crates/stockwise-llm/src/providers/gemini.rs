//! Google Gemini provider implementation
//!
//! Implements the LLMProvider trait over the `generateContent` endpoint.
//! See: https://ai.google.dev/api/generate-content
//!
//! # Example
//!
//! ```no_run
//! use stockwise_llm::{CompletionRequest, LLMProvider};
//! use stockwise_llm::providers::{GeminiConfig, GeminiProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GeminiProvider::new(GeminiConfig::new("AIza..."))?;
//!     let response = provider.complete(CompletionRequest::new("Hello!")).await?;
//!     println!("{}", response.text().unwrap_or_default());
//!     Ok(())
//! }
//! ```

use crate::{CompletionRequest, CompletionResponse, GenerationConfig, LLMError, LLMProvider, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default API base for the public Gemini endpoint
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const PROVIDER: &str = "Gemini";

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,

    /// Base URL up to and including the API version segment
    pub api_base: String,

    /// Model identifier
    pub model: String,

    /// Request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set a custom API base
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `generateContent` URL for the configured model, without credentials
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

/// Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// Fails with a configuration error when the API key is blank.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "Gemini API key must not be empty".to_string(),
            ));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    /// The active configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(
        skip(self, request),
        fields(model = %self.config.model, prompt_len = request.prompt.len())
    )]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to Gemini API");

        let body = GeminiRequest::from(&request);

        let response = self
            .client
            .post(self.config.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LLMError::ApiStatus {
                provider: PROVIDER,
                status: status.as_u16(),
                body: error_text,
            });
        }

        let bytes = response.bytes().await?;
        let decoded: CompletionResponse =
            serde_json::from_slice(&bytes).map_err(|e| LLMError::UnexpectedResponse {
                provider: PROVIDER,
                detail: format!("Failed to parse response: {e}"),
            })?;

        if let Some(usage) = decoded.usage_metadata {
            debug!(
                "Received response - tokens: {}/{}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(decoded)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// Gemini wire format for generateContent

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

impl<'a> From<&'a CompletionRequest> for GeminiRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: request.generation_config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn provider_for(server: &mockito::ServerGuard) -> GeminiProvider {
        let config = GeminiConfig::new("test-key").with_api_base(server.url());
        GeminiProvider::new(config).unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new(GeminiConfig::new("test-key"));
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().name(), "gemini");
    }

    #[test]
    fn test_blank_key_rejected() {
        let result = GeminiProvider::new(GeminiConfig::new("   "));
        assert!(matches!(result, Err(LLMError::ConfigurationError(_))));
    }

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("k").with_api_base("http://localhost:9000/v1beta/");
        assert_eq!(
            config.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_wire_request_shape() {
        let request = CompletionRequest::new("Analyze TCS");
        let value = serde_json::to_value(GeminiRequest::from(&request)).unwrap();

        assert_eq!(
            value,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Analyze TCS" }] }],
                "generationConfig": {
                    "temperature": 0.7_f32,
                    "topK": 40,
                    "topP": 0.95_f32,
                    "maxOutputTokens": 2048
                }
            })
        );
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Hello" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{ "content": { "role": "model", "parts": [{ "text": "Hi!" }] } }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = provider_for(&server);
        let response = provider.complete(CompletionRequest::new("Hello")).await.unwrap();

        assert_eq!(response.text(), Some("Hi!"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("quota exhausted")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .complete(CompletionRequest::new("Hello"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(429));
        assert!(err.to_string().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .complete(CompletionRequest::new("Hello"))
            .await
            .unwrap_err();

        assert!(err.is_malformed_response());
    }
}
