//! Stock analysis agent for BSE-listed equities
//!
//! This crate runs a fixed three-stage conversation with a text-generation
//! model, feeding it market data fetched from Alpha Vantage:
//!
//! 1. **Market**: current quote, initial assessment
//! 2. **Technical**: RSI / MACD / SMA readings plus the conversation so far
//! 3. **Final**: fundamentals are recorded, then the model synthesizes the
//!    whole conversation into a narrative
//!
//! Data fetches are tolerant: a failed request is logged and replaced by a
//! snapshot whose fields all read `"N/A"`. Generation failures are not: they
//! end the run with an error outcome.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockwise_agent::{AgentConfig, StockAnalysisAgent};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AgentConfig::builder().with_env_keys().build()?;
//!     let agent = StockAnalysisAgent::new(config)?;
//!
//!     let outcome = agent.run_analysis("RELIANCE").await;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;
pub mod prompts;
pub mod tools;

pub use config::{AgentConfig, AgentConfigBuilder};
pub use engine::{
    AnalysisFailure, AnalysisOutcome, AnalysisReport, ConversationEntry, ConversationHistory,
    InteractionKind, LogSummary, Role, Stage, StockAnalysisAgent,
};
pub use error::{AnalysisError, ErrorKind, StockError};
pub use interface::{AnalysisBlock, ChartRenderer, FormattedMarketData, TradingViewChart};
pub use tools::{
    DataTool, FundamentalSnapshot, MarketDataTools, MarketSnapshot, TechnicalSnapshot, ToolOutput,
    UNAVAILABLE,
};
