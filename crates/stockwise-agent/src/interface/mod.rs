//! Presentation of analysis results
//!
//! Display formatting for market data and narrative text, plus the chart
//! fragment attached to each successful result.

pub mod chart;
pub mod formatter;

pub use chart::{ChartRenderer, TradingViewChart};
pub use formatter::{
    AnalysisBlock, FormattedMarketData, ListLine, format_price, format_volume, split_analysis,
};
