//! Tool for fetching fundamental data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{UNAVAILABLE, field_or_unavailable};
use crate::api::AlphaVantageClient;
use crate::error::StockError;

/// Valuation figures from the company overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalSnapshot {
    pub pe: String,
    pub eps: String,
    pub market_cap: String,
    pub timestamp: DateTime<Utc>,
}

impl FundamentalSnapshot {
    /// All-sentinel snapshot
    pub fn unavailable(timestamp: DateTime<Utc>) -> Self {
        Self {
            pe: UNAVAILABLE.to_string(),
            eps: UNAVAILABLE.to_string(),
            market_cap: UNAVAILABLE.to_string(),
            timestamp,
        }
    }

    /// Extract from an `OVERVIEW` response
    pub fn from_overview(data: &Value, timestamp: DateTime<Utc>) -> Self {
        Self {
            pe: field_or_unavailable(Some(data), "PERatio"),
            eps: field_or_unavailable(Some(data), "EPS"),
            market_cap: field_or_unavailable(Some(data), "MarketCapitalization"),
            timestamp,
        }
    }

    /// Whether every value field holds the sentinel
    pub fn is_unavailable(&self) -> bool {
        [&self.pe, &self.eps, &self.market_cap]
            .iter()
            .all(|v| v.as_str() == UNAVAILABLE)
    }
}

/// Fetch the company overview for `symbol`, degrading to sentinels on any failure
pub async fn fetch_fundamental_data(
    client: Option<&AlphaVantageClient>,
    symbol: &str,
) -> FundamentalSnapshot {
    let result = match client {
        Some(client) => client.get_company_overview(symbol).await,
        None => Err(StockError::MissingApiKey),
    };

    match result {
        Ok(data) => FundamentalSnapshot::from_overview(&data, Utc::now()),
        Err(e) => {
            warn!(symbol, error = %e, "Fundamental data unavailable, using sentinel values");
            FundamentalSnapshot::unavailable(Utc::now())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_overview() {
        let data = json!({
            "Symbol": "TCS.BSE",
            "PERatio": "29.4",
            "EPS": "126.88",
            "MarketCapitalization": "13547000000000",
            "DividendYield": "0.0125"
        });
        let snapshot = FundamentalSnapshot::from_overview(&data, Utc::now());

        assert_eq!(snapshot.pe, "29.4");
        assert_eq!(snapshot.eps, "126.88");
        assert_eq!(snapshot.market_cap, "13547000000000");
    }

    #[test]
    fn test_none_values_count_as_present_text() {
        // Alpha Vantage reports unknown ratios as the literal string "None"
        let data = json!({ "PERatio": "None", "EPS": "" });
        let snapshot = FundamentalSnapshot::from_overview(&data, Utc::now());

        assert_eq!(snapshot.pe, "None");
        assert_eq!(snapshot.eps, UNAVAILABLE);
        assert_eq!(snapshot.market_cap, UNAVAILABLE);
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(FundamentalSnapshot::unavailable(Utc::now())).unwrap();
        assert_eq!(value["marketCap"], "N/A");
        assert_eq!(value["pe"], "N/A");
    }
}
