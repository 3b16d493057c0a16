//! Terminal rendering of analysis outcomes

use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use stockwise_agent::{AnalysisFailure, AnalysisOutcome, AnalysisReport};

pub fn outcome(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Success(report) => report_text(report),
        AnalysisOutcome::Error(failure) => failure_text(failure),
    }
}

fn report_text(report: &AnalysisReport) -> String {
    let mut out = format!(
        "Analysis for {} ({})\n\n",
        report.symbol,
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );

    out.push_str(&market_table(report).to_string());
    out.push_str("\n\n");

    for block in &report.analysis {
        out.push_str(&block.to_string());
        out.push_str("\n\n");
    }

    let summary = &report.logs.summary;
    out.push_str(&format!(
        "{} interactions, {} model calls, {} tool calls, {} errors, avg response {:.0} ms",
        summary.total_interactions,
        summary.requests,
        summary.tool_calls,
        summary.errors,
        summary.average_response_time_ms
    ));
    out
}

fn market_table(report: &AnalysisReport) -> Table {
    let market = &report.market_data;
    let technical = &report.snapshots.technical;
    let fundamental = &report.snapshots.fundamental;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("METRIC").fg(Color::White),
            Cell::new("VALUE").fg(Color::White),
        ]);

    let change_color = if market.change.starts_with('-') {
        Color::Red
    } else {
        Color::Green
    };

    table.add_row(vec![Cell::new("Price"), Cell::new(&market.price)]);
    table.add_row(vec![
        Cell::new("Change"),
        Cell::new(format!("{} ({})", market.change, market.change_percent)).fg(change_color),
    ]);
    table.add_row(vec![Cell::new("Volume"), Cell::new(&market.volume)]);
    table.add_row(vec![Cell::new("RSI"), Cell::new(&technical.rsi)]);
    table.add_row(vec![Cell::new("MACD"), Cell::new(&technical.macd)]);
    table.add_row(vec![Cell::new("SMA"), Cell::new(&technical.sma)]);
    table.add_row(vec![Cell::new("P/E"), Cell::new(&fundamental.pe)]);
    table.add_row(vec![Cell::new("EPS"), Cell::new(&fundamental.eps)]);
    table.add_row(vec![Cell::new("Market Cap"), Cell::new(&fundamental.market_cap)]);
    table
}

fn failure_text(failure: &AnalysisFailure) -> String {
    format!("❌ Analysis for {} failed: {}", failure.symbol, failure.message)
}
