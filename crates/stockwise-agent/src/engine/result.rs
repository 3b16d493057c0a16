//! Analysis result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::context::{ConversationHistory, RunState};
use super::log::LogReport;
use crate::error::{AnalysisError, ErrorKind};
use crate::interface::{AnalysisBlock, FormattedMarketData, split_analysis};
use crate::tools::{FundamentalSnapshot, MarketSnapshot, TechnicalSnapshot};

/// Raw snapshots gathered during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshots {
    pub market: MarketSnapshot,
    pub technical: TechnicalSnapshot,
    pub fundamental: FundamentalSnapshot,
}

/// Everything produced by a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub symbol: String,
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub market_data: FormattedMarketData,
    pub snapshots: Snapshots,
    /// Final narrative as returned by the model
    pub narrative: String,
    pub analysis: Vec<AnalysisBlock>,
    pub charts: String,
    pub conversation_history: ConversationHistory,
    pub logs: LogReport,
}

impl AnalysisReport {
    /// Assemble the report from the finished run
    pub fn assemble(state: RunState, narrative: String, charts: String) -> Self {
        let now = Utc::now();
        let market = state
            .market
            .unwrap_or_else(|| MarketSnapshot::unavailable(now));
        let technical = state
            .technical
            .unwrap_or_else(|| TechnicalSnapshot::unavailable(now));
        let fundamental = state
            .fundamental
            .unwrap_or_else(|| FundamentalSnapshot::unavailable(now));

        Self {
            symbol: state.symbol,
            run_id: state.run_id,
            timestamp: now,
            market_data: FormattedMarketData::from(&market),
            snapshots: Snapshots {
                market,
                technical,
                fundamental,
            },
            analysis: split_analysis(&narrative),
            narrative,
            charts,
            conversation_history: state.history,
            logs: state.log.into_report(),
        }
    }
}

/// A run that ended in an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub kind: ErrorKind,
    pub message: String,
}

/// Terminal result of `run_analysis`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Success(Box<AnalysisReport>),
    Error(AnalysisFailure),
}

impl AnalysisOutcome {
    pub fn failure(symbol: impl Into<String>, error: &AnalysisError) -> Self {
        Self::Error(AnalysisFailure {
            symbol: symbol.into(),
            timestamp: Utc::now(),
            kind: error.kind(),
            message: error.to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Success(report) => &report.symbol,
            Self::Error(failure) => &failure.symbol,
        }
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::Error(_) => None,
        }
    }

    pub fn failure_details(&self) -> Option<&AnalysisFailure> {
        match self {
            Self::Success(_) => None,
            Self::Error(failure) => Some(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ConversationEntry, InteractionKind};
    use crate::tools::ToolOutput;
    use serde_json::json;

    #[test]
    fn test_assemble_fills_missing_snapshots() {
        let mut state = RunState::new("TCS");
        state.store_snapshot(&ToolOutput::Market(MarketSnapshot {
            price: "3950.00".to_string(),
            change: "1.00".to_string(),
            change_percent: "0.03%".to_string(),
            volume: "4321".to_string(),
            timestamp: Utc::now(),
        }));
        state.history.push(ConversationEntry::assistant("Stable.", Utc::now()));
        state.log.record(InteractionKind::Request, json!({}));
        let run_id = state.run_id;

        let report = AnalysisReport::assemble(
            state,
            "1. Outlook\n\nStable.".to_string(),
            "<div></div>".to_string(),
        );

        assert_eq!(report.run_id, run_id);
        assert_eq!(report.market_data.price, "₹3950.00");
        assert_eq!(report.market_data.volume, "4,321");
        assert!(report.snapshots.technical.is_unavailable());
        assert_eq!(report.analysis.len(), 2);
        assert_eq!(report.conversation_history.len(), 1);
        assert_eq!(report.logs.summary.requests, 1);
    }

    #[test]
    fn test_error_outcome_json() {
        let err = AnalysisError::Validation("Please provide a valid Gemini API key".to_string());
        let outcome = AnalysisOutcome::failure("TCS", &err);
        let value = serde_json::to_value(&outcome).unwrap();

        assert!(!outcome.is_success());
        assert_eq!(outcome.symbol(), "TCS");
        assert_eq!(value["status"], "error");
        assert_eq!(value["symbol"], "TCS");
        assert_eq!(value["kind"], "validation");
        assert_eq!(value["message"], "Please provide a valid Gemini API key");
    }

    #[test]
    fn test_success_outcome_json() {
        let report =
            AnalysisReport::assemble(RunState::new("INFY"), "Done.".to_string(), String::new());
        let value = serde_json::to_value(AnalysisOutcome::Success(Box::new(report))).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["symbol"], "INFY");
        assert_eq!(value["marketData"]["price"], "N/A");
        assert_eq!(value["analysis"][0]["type"], "paragraph");
        assert!(value["runId"].is_string());
        assert!(value["logs"]["summary"].is_object());
    }
}
