//! Configuration for stock analysis runs

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stockwise_llm::providers::{DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL};
use stockwise_utils::env_non_empty;

/// Default Alpha Vantage query endpoint
pub const DEFAULT_ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";

/// Environment variable holding the Gemini key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable holding the Alpha Vantage key
pub const ALPHA_VANTAGE_API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";
/// Environment variable overriding the Gemini model
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";

/// Configuration for the analysis agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Gemini API key (required)
    pub gemini_api_key: Option<String>,

    /// Alpha Vantage API key (optional; without it every fetch degrades to sentinel data)
    pub alpha_vantage_api_key: Option<String>,

    /// Gemini API base URL
    pub gemini_api_base: String,

    /// Gemini model identifier
    pub gemini_model: String,

    /// Alpha Vantage query URL
    pub alpha_vantage_url: String,

    /// Request timeout for both providers
    pub request_timeout: Duration,

    /// Alpha Vantage requests allowed per minute
    pub alpha_vantage_rate_limit: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            alpha_vantage_api_key: None,
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            alpha_vantage_url: DEFAULT_ALPHA_VANTAGE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            alpha_vantage_rate_limit: 5, // free tier
        }
    }
}

impl AgentConfig {
    /// Create a new configuration builder
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Validate the configuration
    ///
    /// The Gemini key must be present and not blank. The Alpha Vantage key is
    /// not checked.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match self.gemini_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(AnalysisError::Validation(
                    "Please provide a valid Gemini API key".to_string(),
                ));
            }
        }

        if self.alpha_vantage_rate_limit == 0 {
            return Err(AnalysisError::Validation(
                "alpha_vantage_rate_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AgentConfig
#[derive(Debug, Default)]
pub struct AgentConfigBuilder {
    gemini_api_key: Option<String>,
    alpha_vantage_api_key: Option<String>,
    gemini_api_base: Option<String>,
    gemini_model: Option<String>,
    alpha_vantage_url: Option<String>,
    request_timeout: Option<Duration>,
    alpha_vantage_rate_limit: Option<u32>,
}

impl AgentConfigBuilder {
    /// Set the Gemini API key
    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    /// Set the Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set the Gemini API base URL
    pub fn gemini_api_base(mut self, url: impl Into<String>) -> Self {
        self.gemini_api_base = Some(url.into());
        self
    }

    /// Set the Gemini model
    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = Some(model.into());
        self
    }

    /// Set the Alpha Vantage query URL
    pub fn alpha_vantage_url(mut self, url: impl Into<String>) -> Self {
        self.alpha_vantage_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the Alpha Vantage rate limit (requests per minute)
    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    /// Fill keys and model from the environment
    ///
    /// Values already set on the builder win over the environment.
    pub fn with_env_keys(mut self) -> Self {
        if self.gemini_api_key.is_none() {
            self.gemini_api_key = env_non_empty(GEMINI_API_KEY_ENV);
        }
        if self.alpha_vantage_api_key.is_none() {
            self.alpha_vantage_api_key = env_non_empty(ALPHA_VANTAGE_API_KEY_ENV);
        }
        if self.gemini_model.is_none() {
            self.gemini_model = env_non_empty(GEMINI_MODEL_ENV);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AgentConfig, AnalysisError> {
        let defaults = AgentConfig::default();

        let config = AgentConfig {
            gemini_api_key: self.gemini_api_key,
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            gemini_api_base: self.gemini_api_base.unwrap_or(defaults.gemini_api_base),
            gemini_model: self.gemini_model.unwrap_or(defaults.gemini_model),
            alpha_vantage_url: self.alpha_vantage_url.unwrap_or(defaults.alpha_vantage_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
        };

        config.validate()?;
        Ok(config)
    }
}
