//! Analysis engine
//!
//! The orchestrator, its per-run state and the result types it produces.

pub mod context;
pub mod log;
pub mod orchestrator;
pub mod result;
pub mod stage;

pub use context::{ConversationEntry, ConversationHistory, Role, RunState};
pub use log::{InteractionEntry, InteractionKind, InteractionLog, LogReport, LogSummary};
pub use orchestrator::StockAnalysisAgent;
pub use result::{AnalysisFailure, AnalysisOutcome, AnalysisReport, Snapshots};
pub use stage::Stage;
