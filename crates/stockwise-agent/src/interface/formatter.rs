//! Presentation formatting for analysis results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tools::{MarketSnapshot, UNAVAILABLE};

pub const RUPEE: &str = "₹";

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;

/// Display-ready copy of a [`MarketSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedMarketData {
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub volume: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&MarketSnapshot> for FormattedMarketData {
    fn from(snapshot: &MarketSnapshot) -> Self {
        Self {
            price: format_price(&snapshot.price),
            change: snapshot.change.clone(),
            change_percent: snapshot.change_percent.clone(),
            volume: format_volume(&snapshot.volume),
            timestamp: snapshot.timestamp,
        }
    }
}

/// Prefix a price with the rupee sign; the sentinel is left as is
pub fn format_price(price: &str) -> String {
    if price == UNAVAILABLE {
        price.to_string()
    } else {
        format!("{RUPEE}{price}")
    }
}

/// Format a share volume in Indian units
///
/// `12345678` becomes `1.23Cr`, `234567` becomes `2.35L` and smaller values
/// are comma grouped. Only the leading digits are read, so `"1500.0"` counts
/// as 1500; digit runs of any length are accepted. Values without leading
/// digits, including the sentinel, are returned unchanged.
pub fn format_volume(volume: &str) -> String {
    let trimmed = volume.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let Ok(count) = trimmed[..digits_end].parse::<f64>() else {
        return volume.to_string();
    };

    if count >= CRORE as f64 {
        format!("{:.2}Cr", count / CRORE as f64)
    } else if count >= LAKH as f64 {
        format!("{:.2}L", count / LAKH as f64)
    } else {
        group_thousands(count as u64)
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One line inside a list block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum ListLine {
    Item(String),
    Text(String),
}

/// A presentation block of the final narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum AnalysisBlock {
    Heading(String),
    List(Vec<ListLine>),
    Paragraph(String),
}

const BULLETS: [&str; 3] = ["* ", "- ", "• "];

fn bullet_text(line: &str) -> Option<&str> {
    let line = line.trim_start();
    BULLETS.iter().find_map(|marker| line.strip_prefix(marker))
}

fn starts_numbered(line: &str) -> bool {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    rest.len() < line.len() && rest.starts_with('.')
}

impl AnalysisBlock {
    fn from_lines(lines: &[&str]) -> Self {
        if lines.first().is_some_and(|l| starts_numbered(l)) {
            return Self::Heading(lines.join("\n"));
        }
        if lines.iter().any(|l| bullet_text(l).is_some()) {
            return Self::List(
                lines
                    .iter()
                    .map(|l| match bullet_text(l) {
                        Some(text) => ListLine::Item(text.trim_end().to_string()),
                        None => ListLine::Text(l.trim().to_string()),
                    })
                    .collect(),
            );
        }
        Self::Paragraph(lines.join("\n"))
    }
}

impl fmt::Display for AnalysisBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading(text) => write!(f, "== {text} =="),
            Self::Paragraph(text) => f.write_str(text),
            Self::List(lines) => {
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    match line {
                        ListLine::Item(text) => write!(f, "  • {text}")?,
                        ListLine::Text(text) => f.write_str(text)?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Split narrative text into blocks at blank lines
pub fn split_analysis(text: &str) -> Vec<AnalysisBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(AnalysisBlock::from_lines(&current));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(AnalysisBlock::from_lines(&current));
    }
    blocks
}
