//! Tool for fetching technical indicator readings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{UNAVAILABLE, field_or_unavailable};
use crate::api::AlphaVantageClient;
use crate::error::StockError;

/// Latest RSI / MACD / SMA readings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub rsi: String,
    pub macd: String,
    pub sma: String,
    pub timestamp: DateTime<Utc>,
}

impl TechnicalSnapshot {
    /// All-sentinel snapshot
    pub fn unavailable(timestamp: DateTime<Utc>) -> Self {
        Self {
            rsi: UNAVAILABLE.to_string(),
            macd: UNAVAILABLE.to_string(),
            sma: UNAVAILABLE.to_string(),
            timestamp,
        }
    }

    /// Extract from a `TECHNICAL_INDICATORS` response
    pub fn from_response(data: &Value, timestamp: DateTime<Utc>) -> Self {
        Self {
            rsi: field_or_unavailable(Some(data), "rsi"),
            macd: field_or_unavailable(Some(data), "macd"),
            sma: field_or_unavailable(Some(data), "sma"),
            timestamp,
        }
    }

    /// Whether every value field holds the sentinel
    pub fn is_unavailable(&self) -> bool {
        [&self.rsi, &self.macd, &self.sma]
            .iter()
            .all(|v| v.as_str() == UNAVAILABLE)
    }
}

/// Fetch indicator readings for `symbol`, degrading to sentinels on any failure
pub async fn fetch_technical_indicators(
    client: Option<&AlphaVantageClient>,
    symbol: &str,
) -> TechnicalSnapshot {
    let result = match client {
        Some(client) => client.get_technical_indicators(symbol).await,
        None => Err(StockError::MissingApiKey),
    };

    match result {
        Ok(data) => TechnicalSnapshot::from_response(&data, Utc::now()),
        Err(e) => {
            warn!(symbol, error = %e, "Technical indicators unavailable, using sentinel values");
            TechnicalSnapshot::unavailable(Utc::now())
        }
    }
}
