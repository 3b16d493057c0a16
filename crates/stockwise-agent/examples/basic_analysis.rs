//! Basic stock analysis example
//!
//! ```bash
//! export GEMINI_API_KEY=your_key_here
//! export ALPHA_VANTAGE_API_KEY=your_key_here  # Optional
//!
//! cargo run --example basic_analysis RELIANCE
//! ```

use std::env;
use stockwise_agent::{AgentConfig, AnalysisOutcome, StockAnalysisAgent};
use stockwise_utils::{LogFormat, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info", LogFormat::Pretty);

    let symbol = env::args()
        .nth(1)
        .unwrap_or_else(|| "RELIANCE".to_string())
        .to_uppercase();

    let config = AgentConfig::builder().with_env_keys().build()?;
    println!("Model: {}", config.gemini_model);
    println!(
        "Market data: {}\n",
        if config.alpha_vantage_api_key.is_some() {
            "Alpha Vantage"
        } else {
            "unavailable (no key)"
        }
    );

    let agent = StockAnalysisAgent::new(config)?;
    match agent.run_analysis(&symbol).await {
        AnalysisOutcome::Success(report) => {
            let market = &report.market_data;
            println!("{symbol}: {} ({})", market.price, market.change_percent);
            println!("Volume: {}\n", report.market_data.volume);
            for block in &report.analysis {
                println!("{block}\n");
            }
            println!("{:#?}", report.logs.summary);
        }
        AnalysisOutcome::Error(failure) => {
            eprintln!("Analysis failed ({:?}): {}", failure.kind, failure.message);
        }
    }

    Ok(())
}
