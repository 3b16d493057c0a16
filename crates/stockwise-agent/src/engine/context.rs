//! Conversation history and per-run state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::log::InteractionLog;
use crate::tools::{FundamentalSnapshot, MarketSnapshot, TechnicalSnapshot, ToolOutput};

/// Who produced a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

impl Role {
    /// Label used when rendering history into a prompt
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Assistant => "ASSISTANT",
            Self::Tool => "TOOL",
        }
    }
}

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ConversationEntry {
    User {
        content: String,
        timestamp: DateTime<Utc>,
    },
    Assistant {
        content: String,
        timestamp: DateTime<Utc>,
    },
    Tool {
        #[serde(rename = "toolName")]
        tool_name: String,
        result: Value,
        timestamp: DateTime<Utc>,
    },
}

impl ConversationEntry {
    /// User entry; surrounding whitespace is trimmed
    pub fn user(content: &str, timestamp: DateTime<Utc>) -> Self {
        Self::User {
            content: content.trim().to_string(),
            timestamp,
        }
    }

    /// Assistant entry; surrounding whitespace is trimmed
    pub fn assistant(content: &str, timestamp: DateTime<Utc>) -> Self {
        Self::Assistant {
            content: content.trim().to_string(),
            timestamp,
        }
    }

    /// Tool entry carrying a structured result
    pub fn tool(tool_name: impl Into<String>, result: Value, timestamp: DateTime<Utc>) -> Self {
        Self::Tool {
            tool_name: tool_name.into(),
            result,
            timestamp,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::Tool { .. } => Role::Tool,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::User { timestamp, .. }
            | Self::Assistant { timestamp, .. }
            | Self::Tool { timestamp, .. } => *timestamp,
        }
    }

    /// Text of a user or assistant entry
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::User { content, .. } | Self::Assistant { content, .. } => Some(content),
            Self::Tool { .. } => None,
        }
    }

    /// Prompt rendering of this entry
    ///
    /// Tool entries render as `TOOL (<name>): <pretty JSON>`, the others as
    /// `<ROLE>: <text>`.
    pub fn render(&self) -> String {
        match self {
            Self::Tool {
                tool_name, result, ..
            } => {
                let pretty = serde_json::to_string_pretty(result).unwrap_or_default();
                format!("{} ({tool_name}): {pretty}", Role::Tool.label())
            }
            Self::User { content, .. } | Self::Assistant { content, .. } => {
                format!("{}: {content}", self.role().label())
            }
        }
    }
}

/// Append-only, chronologically ordered conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    entries: Vec<ConversationEntry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Roles in insertion order
    pub fn roles(&self) -> Vec<Role> {
        self.entries.iter().map(ConversationEntry::role).collect()
    }

    /// Render every entry for inclusion in a prompt, separated by blank lines
    pub fn format(&self) -> String {
        self.entries
            .iter()
            .map(ConversationEntry::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl FromIterator<ConversationEntry> for ConversationHistory {
    fn from_iter<I: IntoIterator<Item = ConversationEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Mutable state of a single analysis run
///
/// Created fresh for every run and threaded through the stages, so runs on
/// the same agent never share history or logs.
#[derive(Debug)]
pub struct RunState {
    pub run_id: Uuid,
    pub symbol: String,
    pub history: ConversationHistory,
    pub log: InteractionLog,
    pub(crate) market: Option<MarketSnapshot>,
    pub(crate) technical: Option<TechnicalSnapshot>,
    pub(crate) fundamental: Option<FundamentalSnapshot>,
}

impl RunState {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            symbol: symbol.into(),
            history: ConversationHistory::new(),
            log: InteractionLog::new(),
            market: None,
            technical: None,
            fundamental: None,
        }
    }

    /// Keep the snapshot carried by a tool output for the final result
    pub fn store_snapshot(&mut self, output: &ToolOutput) {
        match output {
            ToolOutput::Market(snapshot) => self.market = Some(snapshot.clone()),
            ToolOutput::Technical(snapshot) => self.technical = Some(snapshot.clone()),
            ToolOutput::Fundamental(snapshot) => self.fundamental = Some(snapshot.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, second).unwrap()
    }

    #[test]
    fn test_entries_are_trimmed() {
        let entry = ConversationEntry::user("  Analyze TCS \n", at(0));
        assert_eq!(entry.content(), Some("Analyze TCS"));
        assert_eq!(entry.role(), Role::User);
    }

    #[test]
    fn test_format_history() {
        let history: ConversationHistory = [
            ConversationEntry::tool("Market Data Retrieved", json!({ "price": "10" }), at(0)),
            ConversationEntry::user("Initial request", at(1)),
            ConversationEntry::assistant("Looks stable.", at(2)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            history.format(),
            "TOOL (Market Data Retrieved): {\n  \"price\": \"10\"\n}\n\n\
             USER: Initial request\n\n\
             ASSISTANT: Looks stable."
        );
        assert_eq!(history.roles(), vec![Role::Tool, Role::User, Role::Assistant]);
    }

    #[test]
    fn test_entry_serialization() {
        let entry =
            ConversationEntry::tool("Market Data Retrieved", json!({ "price": "N/A" }), at(5));
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["role"], "tool");
        assert_eq!(value["toolName"], "Market Data Retrieved");
        assert_eq!(value["result"]["price"], "N/A");
        assert_eq!(value["timestamp"], "2024-03-01T09:15:05Z");
    }

    #[test]
    fn test_tool_entry_keeps_snapshot_field_order() {
        let snapshot = MarketSnapshot::unavailable(at(0));
        let output = ToolOutput::Market(snapshot.clone());
        let entry = ConversationEntry::tool("Market Data Retrieved", output.to_value(), at(0));

        let rendered = entry.render();
        let expected = format!(
            "TOOL (Market Data Retrieved): {}",
            serde_json::to_string_pretty(&snapshot).unwrap()
        );
        assert_eq!(rendered, expected);

        let position = |key: &str| rendered.find(&format!("\"{key}\"")).unwrap();
        assert!(position("price") < position("change"));
        assert!(position("change") < position("changePercent"));
        assert!(position("changePercent") < position("volume"));
        assert!(position("volume") < position("timestamp"));
    }

    #[test]
    fn test_run_state_is_fresh() {
        let a = RunState::new("TCS");
        let b = RunState::new("TCS");
        assert_ne!(a.run_id, b.run_id);
        assert!(a.history.is_empty());
        assert!(a.log.entries().is_empty());
    }
}
