//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// Transport-level failure (connect, timeout, body read)
    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("{provider} API error: {status} - {body}")]
    ApiStatus {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Response body could not be decoded
    #[error("Invalid response format from {provider} API: {detail}")]
    UnexpectedResponse {
        provider: &'static str,
        detail: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Upstream HTTP status, when the provider returned one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiStatus { status, .. } => Some(*status),
            #[cfg(feature = "gemini")]
            Self::HttpError(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure is in the response payload rather than the transport
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Self::UnexpectedResponse { .. })
    }
}
