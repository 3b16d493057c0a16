//! Tool for fetching the current quote

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{UNAVAILABLE, field_or_unavailable};
use crate::api::AlphaVantageClient;
use crate::error::StockError;

/// Current quote for a symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub volume: String,
    pub timestamp: DateTime<Utc>,
}

impl MarketSnapshot {
    /// All-sentinel snapshot
    pub fn unavailable(timestamp: DateTime<Utc>) -> Self {
        Self {
            price: UNAVAILABLE.to_string(),
            change: UNAVAILABLE.to_string(),
            change_percent: UNAVAILABLE.to_string(),
            volume: UNAVAILABLE.to_string(),
            timestamp,
        }
    }

    /// Extract from a `GLOBAL_QUOTE` response
    pub fn from_quote(data: &Value, timestamp: DateTime<Utc>) -> Self {
        let quote = data.get("Global Quote");
        Self {
            price: field_or_unavailable(quote, "05. price"),
            change: field_or_unavailable(quote, "09. change"),
            change_percent: field_or_unavailable(quote, "10. change percent"),
            volume: field_or_unavailable(quote, "06. volume"),
            timestamp,
        }
    }

    /// Whether every value field holds the sentinel
    pub fn is_unavailable(&self) -> bool {
        [&self.price, &self.change, &self.change_percent, &self.volume]
            .iter()
            .all(|v| v.as_str() == UNAVAILABLE)
    }
}

/// Fetch the quote for `symbol`, degrading to sentinels on any failure
pub async fn fetch_market_data(
    client: Option<&AlphaVantageClient>,
    symbol: &str,
) -> MarketSnapshot {
    let result = match client {
        Some(client) => client.get_quote(symbol).await,
        None => Err(StockError::MissingApiKey),
    };

    match result {
        Ok(data) => MarketSnapshot::from_quote(&data, Utc::now()),
        Err(e) => {
            warn!(symbol, error = %e, "Market data unavailable, using sentinel values");
            MarketSnapshot::unavailable(Utc::now())
        }
    }
}
