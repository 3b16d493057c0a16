//! Command-line host for the stockwise analysis agent
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! export ALPHA_VANTAGE_API_KEY=...
//! stockwise analyze reliance
//! stockwise analyze tcs --format json
//! ```

mod render;

use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;
use std::time::Duration;
use stockwise_agent::{AgentConfig, MarketDataTools, StockAnalysisAgent};
use stockwise_utils::{LogFormat, init_tracing};
use tracing::info;

const DEFAULT_LOG_DIRECTIVES: &str = "warn,stockwise_agent=info";

#[derive(Parser, Debug)]
#[command(name = "stockwise")]
#[command(about = "Stock analysis for BSE-listed equities", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the three-stage analysis for a symbol
    Analyze {
        /// BSE ticker, e.g. RELIANCE
        symbol: String,

        #[command(flatten)]
        keys: KeyArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run a single data tool and print its snapshot as JSON
    Fetch {
        /// get_market_data, get_technical_indicators or get_fundamental_data
        tool: String,

        /// BSE ticker
        symbol: String,

        #[command(flatten)]
        keys: KeyArgs,
    },
}

#[derive(clap::Args, Debug)]
struct KeyArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_key: Option<String>,

    /// Alpha Vantage API key
    #[arg(long, env = "ALPHA_VANTAGE_API_KEY", hide_env_values = true)]
    alpha_vantage_key: Option<String>,

    /// Gemini model
    #[arg(long, env = "GEMINI_MODEL")]
    model: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

impl KeyArgs {
    fn config(&self) -> anyhow::Result<AgentConfig> {
        let mut builder = AgentConfig::builder()
            .with_env_keys()
            .request_timeout(Duration::from_secs(self.timeout));
        if let Some(key) = &self.gemini_key {
            builder = builder.gemini_api_key(key);
        }
        if let Some(key) = &self.alpha_vantage_key {
            builder = builder.alpha_vantage_api_key(key);
        }
        if let Some(model) = &self.model {
            builder = builder.gemini_model(model);
        }
        Ok(builder.build()?)
    }

    /// Market-data settings only; no Gemini key is needed
    fn market_config(&self) -> AgentConfig {
        AgentConfig {
            alpha_vantage_api_key: self.alpha_vantage_key.clone(),
            request_timeout: Duration::from_secs(self.timeout),
            ..AgentConfig::default()
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(DEFAULT_LOG_DIRECTIVES, log_format);

    match cli.command {
        Command::Analyze {
            symbol,
            keys,
            format,
        } => {
            let symbol = symbol.trim().to_uppercase();
            let agent = StockAnalysisAgent::new(keys.config()?)?;

            info!(%symbol, "Starting analysis");
            let outcome = agent.run_analysis(&symbol).await;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                OutputFormat::Text => println!("{}", render::outcome(&outcome)),
            }

            Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Fetch { tool, symbol, keys } => {
            let tools = MarketDataTools::from_config(&keys.market_config())?;
            let output = tools.execute(&tool, &symbol.trim().to_uppercase()).await?;

            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
