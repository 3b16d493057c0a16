//! Alpha Vantage API client

use crate::error::{Result, StockError};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Exchange suffix appended to every symbol
pub const EXCHANGE_SUFFIX: &str = "BSE";

const FREE_TIER_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(5) {
    Some(n) => n,
    None => panic!("free tier quota must be non-zero"),
};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage query functions used by the data tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFunction {
    GlobalQuote,
    TechnicalIndicators,
    Overview,
}

impl QueryFunction {
    /// Value of the `function` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GlobalQuote => "GLOBAL_QUOTE",
            Self::TechnicalIndicators => "TECHNICAL_INDICATORS",
            Self::Overview => "OVERVIEW",
        }
    }
}

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `base_url` - Query endpoint, normally `https://www.alphavantage.co/query`
    /// * `rate_limit` - Maximum requests per minute (5 on the free tier)
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        rate_limit: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(FREE_TIER_PER_MINUTE));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            rate_limiter,
        })
    }

    /// Exchange-qualified symbol sent to the provider, e.g. `RELIANCE.BSE`
    pub fn qualified_symbol(symbol: &str) -> String {
        format!("{symbol}.{EXCHANGE_SUFFIX}")
    }

    /// Get global quote (current price data)
    pub async fn get_quote(&self, symbol: &str) -> Result<Value> {
        self.query(QueryFunction::GlobalQuote, symbol).await
    }

    /// Get technical indicator readings
    pub async fn get_technical_indicators(&self, symbol: &str) -> Result<Value> {
        self.query(QueryFunction::TechnicalIndicators, symbol).await
    }

    /// Get company overview and fundamental data
    pub async fn get_company_overview(&self, symbol: &str) -> Result<Value> {
        self.query(QueryFunction::Overview, symbol).await
    }

    async fn query(&self, function: QueryFunction, symbol: &str) -> Result<Value> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let qualified = Self::qualified_symbol(symbol);
        debug!(function = function.as_str(), symbol = %qualified, "Querying Alpha Vantage");

        let params = [
            ("function", function.as_str()),
            ("symbol", qualified.as_str()),
            ("apikey", self.api_key.as_str()),
        ];

        let response = self.client.get(&self.base_url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(StockError::HttpStatus(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        let data: Value = serde_json::from_slice(&bytes)?;

        check_api_errors(&data)?;

        Ok(data)
    }
}

/// Alpha Vantage reports failures with a 200 status and a marker key
fn check_api_errors(data: &Value) -> Result<()> {
    if let Some(error) = data.get("Error Message") {
        return Err(StockError::AlphaVantageError(message_text(error)));
    }

    for key in ["Note", "Information"] {
        if let Some(note) = data.get(key) {
            return Err(StockError::RateLimitExceeded {
                provider: "Alpha Vantage".to_string(),
                message: message_text(note),
            });
        }
    }

    Ok(())
}

fn message_text(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}
