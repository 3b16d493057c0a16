//! Market data tools and the tool dispatcher
//!
//! Each tool issues one read-only request to Alpha Vantage and always yields a
//! well-formed snapshot: provider failures are logged and replaced by the
//! all-sentinel record for that data category.

pub mod fundamental;
pub mod stock_data;
pub mod technical;

pub use fundamental::FundamentalSnapshot;
pub use stock_data::MarketSnapshot;
pub use technical::TechnicalSnapshot;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::api::AlphaVantageClient;
use crate::config::AgentConfig;
use crate::error::{AnalysisError, StockError};

/// Marker substituted for any value the provider did not supply
pub const UNAVAILABLE: &str = "N/A";

/// The data tools the orchestrator can call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTool {
    MarketData,
    TechnicalIndicators,
    FundamentalData,
}

impl DataTool {
    /// All tools, in stage order
    pub const ALL: [Self; 3] = [
        Self::MarketData,
        Self::TechnicalIndicators,
        Self::FundamentalData,
    ];

    /// Wire name used for dispatch and in the conversation history
    pub fn name(self) -> &'static str {
        match self {
            Self::MarketData => "get_market_data",
            Self::TechnicalIndicators => "get_technical_indicators",
            Self::FundamentalData => "get_fundamental_data",
        }
    }

    /// Label of the tool's entry in the conversation history
    pub fn history_label(self) -> &'static str {
        match self {
            Self::MarketData => "Market Data Retrieved",
            Self::TechnicalIndicators => "Technical Indicators Retrieved",
            Self::FundamentalData => "Fundamental Data Retrieved",
        }
    }
}

impl fmt::Display for DataTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataTool {
    type Err = AnalysisError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| AnalysisError::UnknownTool(name.to_string()))
    }
}

/// Snapshot produced by a data tool
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Market(MarketSnapshot),
    Technical(TechnicalSnapshot),
    Fundamental(FundamentalSnapshot),
}

impl ToolOutput {
    /// The tool that produces this kind of output
    pub fn tool(&self) -> DataTool {
        match self {
            Self::Market(_) => DataTool::MarketData,
            Self::Technical(_) => DataTool::TechnicalIndicators,
            Self::Fundamental(_) => DataTool::FundamentalData,
        }
    }

    /// JSON form stored in the conversation history
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Dispatcher from tool names to the three fetch operations
#[derive(Debug, Clone)]
pub struct MarketDataTools {
    client: Option<AlphaVantageClient>,
}

impl MarketDataTools {
    /// Create the tool set
    ///
    /// Without a client every tool returns its sentinel snapshot.
    pub fn new(client: Option<AlphaVantageClient>) -> Self {
        Self { client }
    }

    /// Build the tool set from the market-data part of `config`
    ///
    /// Only the Alpha Vantage settings are read. A missing or blank key gives
    /// a tool set without a client.
    pub fn from_config(config: &AgentConfig) -> Result<Self, StockError> {
        let key = config
            .alpha_vantage_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());
        let Some(key) = key else {
            warn!("Alpha Vantage API key not configured, market data will be unavailable");
            return Ok(Self::new(None));
        };

        let client = AlphaVantageClient::new(
            key,
            &config.alpha_vantage_url,
            config.alpha_vantage_rate_limit,
            config.request_timeout,
        )?;
        Ok(Self::new(Some(client)))
    }

    /// Whether fetches go to the network
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Run the tool called `name` for `symbol`
    ///
    /// Fails only for an unrecognized name; fetch failures are absorbed into
    /// sentinel snapshots.
    pub async fn execute(&self, name: &str, symbol: &str) -> Result<ToolOutput, AnalysisError> {
        let tool: DataTool = name.parse()?;
        Ok(self.dispatch(tool, symbol).await)
    }

    /// Run a known tool
    pub async fn dispatch(&self, tool: DataTool, symbol: &str) -> ToolOutput {
        let client = self.client.as_ref();
        match tool {
            DataTool::MarketData => {
                ToolOutput::Market(stock_data::fetch_market_data(client, symbol).await)
            }
            DataTool::TechnicalIndicators => {
                ToolOutput::Technical(technical::fetch_technical_indicators(client, symbol).await)
            }
            DataTool::FundamentalData => {
                ToolOutput::Fundamental(fundamental::fetch_fundamental_data(client, symbol).await)
            }
        }
    }
}

/// Read `key` from `container` as display text, or the sentinel
///
/// Missing keys, `null` and blank strings count as absent. Other scalars and
/// nested values are kept as their JSON text.
pub(crate) fn field_or_unavailable(container: Option<&Value>, key: &str) -> String {
    match container.and_then(|c| c.get(key)) {
        None | Some(Value::Null) => UNAVAILABLE.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => UNAVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
