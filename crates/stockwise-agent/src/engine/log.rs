//! Interaction log for a single run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Category of a logged interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionKind {
    Request,
    Response,
    Error,
    ToolCall,
    ProcessedResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub payload: Value,
}

/// Aggregate counts over an [`InteractionLog`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSummary {
    pub total_interactions: usize,
    pub requests: usize,
    pub responses: usize,
    pub errors: usize,
    pub tool_calls: usize,
    /// Mean REQUEST to RESPONSE latency; `0.0` when nothing was paired
    pub average_response_time_ms: f64,
}

/// Log entries plus their summary, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogReport {
    pub logs: Vec<InteractionEntry>,
    pub summary: LogSummary,
}

/// Append-only record of requests, responses, tool calls and errors
#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    entries: Vec<InteractionEntry>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an interaction stamped with the current time
    pub fn record(&mut self, kind: InteractionKind, payload: Value) {
        self.record_at(kind, payload, Utc::now());
    }

    /// Record an interaction with an explicit timestamp
    pub fn record_at(&mut self, kind: InteractionKind, payload: Value, timestamp: DateTime<Utc>) {
        debug!(kind = ?kind, %payload, "Interaction recorded");
        self.entries.push(InteractionEntry {
            timestamp,
            kind,
            payload,
        });
    }

    pub fn entries(&self) -> &[InteractionEntry] {
        &self.entries
    }

    fn count(&self, kind: InteractionKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Summarize the log
    ///
    /// Each REQUEST is paired with the next RESPONSE; a later REQUEST replaces
    /// an unanswered one.
    pub fn summary(&self) -> LogSummary {
        let mut pending: Option<DateTime<Utc>> = None;
        let mut total_ms = 0.0;
        let mut paired = 0usize;

        for entry in &self.entries {
            match entry.kind {
                InteractionKind::Request => pending = Some(entry.timestamp),
                InteractionKind::Response => {
                    if let Some(started) = pending.take() {
                        let elapsed = entry.timestamp - started;
                        total_ms += elapsed
                            .num_microseconds()
                            .map_or(0.0, |us| us as f64 / 1000.0);
                        paired += 1;
                    }
                }
                _ => {}
            }
        }

        LogSummary {
            total_interactions: self.entries.len(),
            requests: self.count(InteractionKind::Request),
            responses: self.count(InteractionKind::Response),
            errors: self.count(InteractionKind::Error),
            tool_calls: self.count(InteractionKind::ToolCall),
            average_response_time_ms: if paired == 0 {
                0.0
            } else {
                total_ms / paired as f64
            },
        }
    }

    pub fn into_report(self) -> LogReport {
        let summary = self.summary();
        LogReport {
            logs: self.entries,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap()
    }

    #[test]
    fn test_empty_summary() {
        let summary = InteractionLog::new().summary();
        assert_eq!(summary.total_interactions, 0);
        assert_eq!(summary.average_response_time_ms, 0.0);
    }

    #[test]
    fn test_average_response_time() {
        let t0 = base();
        let mut log = InteractionLog::new();
        log.record_at(InteractionKind::ToolCall, json!({}), t0);
        log.record_at(InteractionKind::Request, json!({}), t0);
        log.record_at(InteractionKind::Response, json!({}), t0 + Duration::milliseconds(200));
        log.record_at(
            InteractionKind::ProcessedResponse,
            json!({}),
            t0 + Duration::milliseconds(201),
        );
        log.record_at(InteractionKind::Request, json!({}), t0 + Duration::seconds(1));
        log.record_at(
            InteractionKind::Response,
            json!({}),
            t0 + Duration::seconds(1) + Duration::milliseconds(400),
        );

        let summary = log.summary();
        assert_eq!(summary.total_interactions, 6);
        assert_eq!(summary.requests, 2);
        assert_eq!(summary.responses, 2);
        assert_eq!(summary.tool_calls, 1);
        assert_eq!(summary.errors, 0);
        assert!((summary.average_response_time_ms - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_three_stage_average_latency() {
        let t0 = base();
        let ms = Duration::milliseconds;
        let mut log = InteractionLog::new();

        for (offset, latency) in [(0, 100), (1_000, 200), (2_000, 600)] {
            let start = t0 + ms(offset);
            log.record_at(InteractionKind::ToolCall, json!({}), start);
            log.record_at(InteractionKind::Request, json!({}), start + ms(10));
            log.record_at(InteractionKind::Response, json!({}), start + ms(10 + latency));
            log.record_at(
                InteractionKind::ProcessedResponse,
                json!({}),
                start + ms(11 + latency),
            );
        }

        let summary = log.summary();
        assert_eq!(summary.requests, 3);
        assert_eq!(summary.responses, 3);
        assert_eq!(summary.tool_calls, 3);
        assert_eq!(summary.total_interactions, 12);
        assert!((summary.average_response_time_ms - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unanswered_request_is_not_paired() {
        let t0 = base();
        let mut log = InteractionLog::new();
        log.record_at(InteractionKind::Request, json!({}), t0);
        log.record_at(
            InteractionKind::Error,
            json!({ "error": "boom" }),
            t0 + Duration::seconds(2),
        );

        let summary = log.summary();
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.average_response_time_ms, 0.0);
    }

    #[test]
    fn test_kind_wire_names() {
        let mut log = InteractionLog::new();
        log.record(InteractionKind::ProcessedResponse, json!({ "text": "ok" }));
        let report = serde_json::to_value(log.into_report()).unwrap();

        assert_eq!(report["logs"][0]["type"], "PROCESSED_RESPONSE");
        assert_eq!(report["summary"]["totalInteractions"], 1);
        assert_eq!(report["summary"]["averageResponseTimeMs"], 0.0);
    }
}
