//! Three-stage analysis orchestrator

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use stockwise_llm::providers::{GeminiConfig, GeminiProvider};
use stockwise_llm::{CompletionRequest, LLMProvider};
use tracing::{Instrument, error, info, info_span};

use super::context::{ConversationEntry, RunState};
use super::log::InteractionKind;
use super::result::{AnalysisOutcome, AnalysisReport};
use super::stage::Stage;
use crate::config::AgentConfig;
use crate::error::AnalysisError;
use crate::interface::{ChartRenderer, TradingViewChart};
use crate::prompts;
use crate::tools::{DataTool, MarketDataTools, ToolOutput};

type Result<T> = std::result::Result<T, AnalysisError>;

/// Runs market, technical and final stages against a symbol
///
/// The agent holds only immutable collaborators. Every call to
/// [`run_analysis`](Self::run_analysis) works on its own [`RunState`], so one
/// instance can serve overlapping runs.
pub struct StockAnalysisAgent {
    provider: Arc<dyn LLMProvider>,
    tools: MarketDataTools,
    charts: Arc<dyn ChartRenderer>,
}

impl StockAnalysisAgent {
    /// Create an agent backed by Gemini
    ///
    /// Fails with [`AnalysisError::Validation`] when the Gemini key is
    /// missing or blank. No network I/O happens here.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or_else(|| {
                AnalysisError::Validation("Please provide a valid Gemini API key".to_string())
            })?;

        let gemini = GeminiConfig::new(api_key)
            .with_api_base(&config.gemini_api_base)
            .with_model(&config.gemini_model)
            .with_timeout(config.request_timeout);
        let provider =
            GeminiProvider::new(gemini).map_err(|e| AnalysisError::Validation(e.to_string()))?;

        Self::with_provider(config, Arc::new(provider))
    }

    /// Create an agent with any text-generation provider
    pub fn with_provider(config: AgentConfig, provider: Arc<dyn LLMProvider>) -> Result<Self> {
        config.validate()?;

        let tools = MarketDataTools::from_config(&config).map_err(|e| {
            AnalysisError::Validation(format!("Failed to build market data client: {e}"))
        })?;

        Ok(Self {
            provider,
            tools,
            charts: Arc::new(TradingViewChart::default()),
        })
    }

    /// Replace the chart renderer
    pub fn with_chart_renderer(mut self, charts: Arc<dyn ChartRenderer>) -> Self {
        self.charts = charts;
        self
    }

    pub fn tools(&self) -> &MarketDataTools {
        &self.tools
    }

    /// Run the full analysis for `symbol`
    ///
    /// Never fails: any error ends the run early and is reported as an
    /// [`AnalysisOutcome::Error`].
    pub async fn run_analysis(&self, symbol: &str) -> AnalysisOutcome {
        let symbol = symbol.trim();
        let state = RunState::new(symbol);
        let span = info_span!("analysis", symbol, run_id = %state.run_id);

        match self.execute(state).instrument(span).await {
            Ok(report) => {
                info!(
                    symbol,
                    interactions = report.logs.summary.total_interactions,
                    "Analysis complete"
                );
                AnalysisOutcome::Success(Box::new(report))
            }
            Err(e) => {
                error!(symbol, kind = ?e.kind(), error = %e, "Analysis failed");
                AnalysisOutcome::failure(symbol, &e)
            }
        }
    }

    async fn execute(&self, mut state: RunState) -> Result<AnalysisReport> {
        if state.symbol.is_empty() {
            return Err(AnalysisError::Validation(
                "Stock symbol must not be empty".to_string(),
            ));
        }

        let mut narrative = String::new();
        for stage in Stage::ALL {
            narrative = self.run_stage(&mut state, stage).await?;
        }

        let charts = self.charts.render(&state.symbol)?;
        Ok(AnalysisReport::assemble(state, narrative, charts))
    }

    /// Fetch, prompt and generate for one stage; returns the model reply
    async fn run_stage(&self, state: &mut RunState, stage: Stage) -> Result<String> {
        info!(%stage, "Starting stage");

        let output = self.call_tool(state, stage.tool()).await?;
        let prompt = match &output {
            ToolOutput::Market(market) => prompts::initial_query(&state.symbol, market)?,
            ToolOutput::Technical(technical) => {
                prompts::technical_query(&state.symbol, &state.history, technical)?
            }
            ToolOutput::Fundamental(_) => prompts::final_query(&state.symbol, &state.history)?,
        };
        state.history.push(ConversationEntry::user(&prompt, Utc::now()));

        let reply = self.generate(state, stage, prompt).await?;
        state.history.push(ConversationEntry::assistant(&reply, Utc::now()));

        info!(%stage, reply_len = reply.len(), "Stage complete");
        Ok(reply)
    }

    async fn call_tool(&self, state: &mut RunState, tool: DataTool) -> Result<ToolOutput> {
        let name = tool.name();
        state.log.record(
            InteractionKind::ToolCall,
            json!({ "tool": name, "symbol": state.symbol }),
        );

        let output = match self.tools.execute(name, &state.symbol).await {
            Ok(output) => output,
            Err(e) => {
                state.log.record(
                    InteractionKind::Error,
                    json!({ "tool": name, "error": e.to_string() }),
                );
                return Err(e);
            }
        };

        state.history.push(ConversationEntry::tool(
            tool.history_label(),
            output.to_value(),
            Utc::now(),
        ));
        state.store_snapshot(&output);
        Ok(output)
    }

    async fn generate(&self, state: &mut RunState, stage: Stage, prompt: String) -> Result<String> {
        let request = CompletionRequest::new(prompt);
        state.log.record(
            InteractionKind::Request,
            json!({ "provider": self.provider.name(), "stage": stage, "body": request }),
        );

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                state.log.record(
                    InteractionKind::Error,
                    json!({ "stage": stage, "status": e.status(), "error": e.to_string() }),
                );
                return Err(AnalysisError::from_llm(e, &state.symbol, stage));
            }
        };
        state.log.record(
            InteractionKind::Response,
            json!({ "stage": stage, "data": response }),
        );

        let Some(text) = response.text() else {
            let err = AnalysisError::MalformedResponse {
                symbol: state.symbol.clone(),
                stage,
                detail: "no generated text at candidates[0].content.parts[0].text".to_string(),
            };
            state.log.record(
                InteractionKind::Error,
                json!({ "stage": stage, "error": err.to_string() }),
            );
            return Err(err);
        };

        state.log.record(
            InteractionKind::ProcessedResponse,
            json!({ "stage": stage, "text": text }),
        );
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use stockwise_llm::{CompletionResponse, LLMError};

    mock! {
        pub Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(
                &self,
                request: CompletionRequest,
            ) -> stockwise_llm::Result<CompletionResponse>;
            fn name(&self) -> &'static str;
        }
    }

    fn config() -> AgentConfig {
        AgentConfig::builder().gemini_api_key("test-key").build().unwrap()
    }

    #[test]
    fn test_new_rejects_blank_key() {
        let config = AgentConfig {
            gemini_api_key: Some("   ".to_string()),
            ..AgentConfig::default()
        };
        let err = StockAnalysisAgent::new(config).err().unwrap();
        assert!(matches!(err, AnalysisError::Validation(_)));
    }

    #[test]
    fn test_with_provider_applies_validation() {
        let provider = Arc::new(MockProvider::new());
        let result = StockAnalysisAgent::with_provider(AgentConfig::default(), provider);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_blank_symbol_is_rejected_without_calls() {
        let mut provider = MockProvider::new();
        provider.expect_complete().never();
        provider.expect_name().return_const("mock");

        let agent = StockAnalysisAgent::with_provider(config(), Arc::new(provider)).unwrap();
        let outcome = agent.run_analysis("  ").await;

        let failure = outcome.failure_details().unwrap();
        assert_eq!(failure.kind, crate::error::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_empty_text_aborts_first_stage() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete()
            .times(1)
            .returning(|_| Ok(CompletionResponse::from_text("")));

        let agent = StockAnalysisAgent::with_provider(config(), Arc::new(provider)).unwrap();
        let outcome = agent.run_analysis("TCS").await;

        let failure = outcome.failure_details().unwrap();
        assert_eq!(failure.kind, crate::error::ErrorKind::MalformedResponse);
        assert!(failure.message.contains("market"));
    }

    #[tokio::test]
    async fn test_status_error_aborts_with_transport_kind() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider.expect_complete().times(1).returning(|_| {
            Err(LLMError::ApiStatus {
                provider: "Gemini",
                status: 503,
                body: "overloaded".to_string(),
            })
        });

        let agent = StockAnalysisAgent::with_provider(config(), Arc::new(provider)).unwrap();
        let outcome = agent.run_analysis("TCS").await;

        let failure = outcome.failure_details().unwrap();
        assert_eq!(failure.kind, crate::error::ErrorKind::Transport);
        assert_eq!(failure.symbol, "TCS");
        assert!(!failure.message.is_empty());
    }

    #[tokio::test]
    async fn test_custom_chart_renderer() {
        struct Plain;
        impl ChartRenderer for Plain {
            fn render(&self, symbol: &str) -> Result<String> {
                Ok(format!("chart:{symbol}"))
            }
        }

        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete()
            .times(3)
            .returning(|_| Ok(CompletionResponse::from_text("ok")));

        let agent = StockAnalysisAgent::with_provider(config(), Arc::new(provider))
            .unwrap()
            .with_chart_renderer(Arc::new(Plain));
        let outcome = agent.run_analysis("TCS").await;

        assert_eq!(outcome.report().unwrap().charts, "chart:TCS");
    }
}
