//! Error types for stock analysis operations
//!
//! Two families live here. [`StockError`] covers the market-data provider and
//! never escapes a data tool: tools log it and fall back to sentinel
//! snapshots. [`AnalysisError`] is the closed set of failures that abort an
//! analysis run.

use serde::{Deserialize, Serialize};
use stockwise_llm::LLMError;
use thiserror::Error;

use crate::engine::Stage;

/// Market-data provider errors
#[derive(Debug, Error)]
pub enum StockError {
    /// No Alpha Vantage key was configured
    #[error("Alpha Vantage API key not configured")]
    MissingApiKey,

    /// Non-success HTTP status
    #[error("Alpha Vantage HTTP error: {0}")]
    HttpStatus(u16),

    /// Error payload returned by Alpha Vantage
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// Rate limit or quota notice returned by Alpha Vantage
    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimitExceeded { provider: String, message: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for market-data operations
pub type Result<T> = std::result::Result<T, StockError>;

/// Coarse classification of [`AnalysisError`], exposed in error outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    UnknownTool,
    Transport,
    MalformedResponse,
    Template,
}

/// Failures that abort an analysis run
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Rejected input or configuration; raised before any network activity
    #[error("{0}")]
    Validation(String),

    /// Tool dispatcher received a name it does not know
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The text-generation call failed in transport or returned a non-success status
    #[error("Text generation failed for {symbol} during {stage} stage: {detail}")]
    Transport {
        symbol: String,
        stage: Stage,
        status: Option<u16>,
        detail: String,
    },

    /// The text-generation response could not be decoded or lacked generated text
    #[error("Invalid response for {symbol} during {stage} stage: {detail}")]
    MalformedResponse {
        symbol: String,
        stage: Stage,
        detail: String,
    },

    /// A prompt or chart template failed to render
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl AnalysisError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::UnknownTool(_) => ErrorKind::UnknownTool,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Template(_) => ErrorKind::Template,
        }
    }

    /// Attach run context to a provider failure
    pub fn from_llm(err: LLMError, symbol: &str, stage: Stage) -> Self {
        if err.is_malformed_response() {
            Self::MalformedResponse {
                symbol: symbol.to_string(),
                stage,
                detail: err.to_string(),
            }
        } else {
            Self::Transport {
                symbol: symbol.to_string(),
                stage,
                status: err.status(),
                detail: err.to_string(),
            }
        }
    }
}
