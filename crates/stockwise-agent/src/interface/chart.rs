//! Chart fragments embedded in analysis results

use minijinja::context;

use crate::api::EXCHANGE_SUFFIX;
use crate::error::AnalysisError;
use crate::prompts::PromptTemplate;

/// Produces the presentation fragment for a symbol
pub trait ChartRenderer: Send + Sync {
    fn render(&self, symbol: &str) -> Result<String, AnalysisError>;
}

const TRADINGVIEW_WIDGET: PromptTemplate = PromptTemplate::new(
    "chart.tradingview.html",
    r##"<div class="tradingview-widget-container">
  <div id="{{ container_id|e }}"></div>
  <script type="text/javascript" src="https://s3.tradingview.com/tv.js"></script>
  <script type="text/javascript">
    new TradingView.widget({
      "width": "100%",
      "height": {{ height }},
      "symbol": {{ chart_symbol|tojson }},
      "interval": {{ interval|tojson }},
      "timezone": {{ timezone|tojson }},
      "theme": {{ theme|tojson }},
      "style": "1",
      "locale": "in",
      "toolbar_bg": "#f1f3f6",
      "enable_publishing": false,
      "allow_symbol_change": true,
      "container_id": {{ container_id|tojson }},
      "studies": {{ studies|tojson }}
    });
  </script>
</div>"##,
);

/// TradingView advanced chart widget for BSE listings
#[derive(Debug, Clone)]
pub struct TradingViewChart {
    pub height: u32,
    pub interval: String,
    pub timezone: String,
    pub theme: String,
    pub studies: Vec<String>,
}

impl Default for TradingViewChart {
    fn default() -> Self {
        Self {
            height: 500,
            interval: "D".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            theme: "light".to_string(),
            studies: vec![
                "MASimple@tv-basicstudies".to_string(),
                "RSI@tv-basicstudies".to_string(),
                "MACD@tv-basicstudies".to_string(),
            ],
        }
    }
}

impl ChartRenderer for TradingViewChart {
    fn render(&self, symbol: &str) -> Result<String, AnalysisError> {
        Ok(TRADINGVIEW_WIDGET.render(context! {
            container_id => format!("tradingview_{symbol}"),
            chart_symbol => format!("{EXCHANGE_SUFFIX}:{symbol}"),
            height => self.height,
            interval => &self.interval,
            timezone => &self.timezone,
            theme => &self.theme,
            studies => &self.studies,
        })?)
    }
}
