//! User prompts for each analysis stage

use minijinja::context;

use super::PromptTemplate;
use crate::engine::ConversationHistory;
use crate::error::AnalysisError;
use crate::tools::{MarketSnapshot, TechnicalSnapshot};

pub const INITIAL_ANALYSIS: PromptTemplate = PromptTemplate::new(
    "stock.user.initial_analysis",
    "Initial Analysis Request for {{ symbol }}

Market Data:
{{ market_data }}

Provide initial market assessment focusing on current price action and trends.",
);

pub const TECHNICAL_ANALYSIS: PromptTemplate = PromptTemplate::new(
    "stock.user.technical_analysis",
    "Technical Analysis for {{ symbol }}

Previous Conversation:
{{ history }}

Technical Indicators:
{{ technical_data }}

Analyze these technical indicators and provide insights.",
);

pub const FINAL_ANALYSIS: PromptTemplate = PromptTemplate::new(
    "stock.user.final_analysis",
    "Final Analysis for {{ symbol }}

Complete Conversation History:
{{ history }}

Synthesize all previous analyses and provide a comprehensive final assessment.",
);

/// Market stage prompt: symbol and quote, no history
pub fn initial_query(symbol: &str, market: &MarketSnapshot) -> Result<String, AnalysisError> {
    let market_data = serde_json::to_string_pretty(market).unwrap_or_default();
    Ok(INITIAL_ANALYSIS.render(context! { symbol, market_data })?)
}

/// Technical stage prompt: symbol, the history so far and the indicator readings
pub fn technical_query(
    symbol: &str,
    history: &ConversationHistory,
    technical: &TechnicalSnapshot,
) -> Result<String, AnalysisError> {
    let technical_data = serde_json::to_string_pretty(technical).unwrap_or_default();
    Ok(TECHNICAL_ANALYSIS.render(context! {
        symbol,
        history => history.format(),
        technical_data,
    })?)
}

/// Final stage prompt: symbol and the complete history
pub fn final_query(symbol: &str, history: &ConversationHistory) -> Result<String, AnalysisError> {
    Ok(FINAL_ANALYSIS.render(context! {
        symbol,
        history => history.format(),
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ConversationEntry;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn fixture_history() -> ConversationHistory {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
        [
            ConversationEntry::tool("Market Data Retrieved", json!({ "price": "3950.00" }), ts),
            ConversationEntry::user("Initial Analysis Request for TCS", ts),
            ConversationEntry::assistant("Price is consolidating near 3950.", ts),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_initial_query() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
        let market = MarketSnapshot::unavailable(ts);
        let prompt = initial_query("TCS", &market).unwrap();

        let expected = format!(
            "Initial Analysis Request for TCS\n\nMarket Data:\n{}\n\n\
             Provide initial market assessment focusing on current price action and trends.",
            serde_json::to_string_pretty(&market).unwrap()
        );
        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_technical_query_embeds_history() {
        let history = fixture_history();
        let technical = TechnicalSnapshot::unavailable(Utc::now());
        let prompt = technical_query("TCS", &history, &technical).unwrap();

        assert!(prompt.starts_with("Technical Analysis for TCS\n\nPrevious Conversation:\n"));
        assert!(prompt.contains(&history.format()));
        assert!(prompt.contains("\"rsi\": \"N/A\""));
        assert!(prompt.ends_with("Analyze these technical indicators and provide insights."));
    }

    #[test]
    fn test_final_query_is_deterministic() {
        let history = fixture_history();
        let first = final_query("TCS", &history).unwrap();
        let second = final_query("TCS", &history).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first,
            format!(
                "Final Analysis for TCS\n\nComplete Conversation History:\n{}\n\n\
                 Synthesize all previous analyses and provide a comprehensive final assessment.",
                history.format()
            )
        );
    }
}
