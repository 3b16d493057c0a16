//! Analysis stages

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tools::DataTool;

/// One tool-fetch + prompt-build + generation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Market,
    Technical,
    Final,
}

impl Stage {
    /// All stages, in execution order
    pub const ALL: [Self; 3] = [Self::Market, Self::Technical, Self::Final];

    /// Data tool invoked at the start of the stage
    pub fn tool(self) -> DataTool {
        match self {
            Self::Market => DataTool::MarketData,
            Self::Technical => DataTool::TechnicalIndicators,
            Self::Final => DataTool::FundamentalData,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Technical => "technical",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
