// =============================================================================
// Runtime Configuration — dashboard defaults and provider settings
// =============================================================================
//
// Every tunable the dashboard uses lives here. All fields carry
// `#[serde(default)]` so a partial JSON file only overrides what it names.
//
// The default end date is deliberately absent: it is "today", resolved on
// every request rather than captured when the process starts.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::IndicatorParams;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_tickers() -> Vec<TickerOption> {
    [
        ("Infosys", "INFY.NS"),
        ("Reliance", "RELIANCE.NS"),
        ("Tata Consultancy Services", "TCS.NS"),
        ("HDFC Bank", "HDFCBANK.NS"),
        ("HUL", "HINDUNILVR.NS"),
    ]
    .into_iter()
    .map(|(label, symbol)| TickerOption::new(label, symbol))
    .collect()
}

fn default_ticker() -> String {
    "INFY.NS".to_string()
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    250
}

fn default_bollinger_window() -> usize {
    20
}

fn default_bollinger_num_std() -> f64 {
    2.0
}

fn default_stoch_k_window() -> usize {
    14
}

fn default_stoch_d_window() -> usize {
    3
}

fn default_bind_addr() -> String {
    "0.0.0.0:8050".to_string()
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com/v8/finance/chart".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) stock-dashboard/1.0".to_string()
}

// =============================================================================
// TickerOption
// =============================================================================

/// One entry of the ticker dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerOption {
    pub label: String,
    pub symbol: String,
}

impl TickerOption {
    pub fn new(label: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            symbol: symbol.into(),
        }
    }
}

// =============================================================================
// ProviderConfig
// =============================================================================

/// Settings for the market-data HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Chart endpoint; the ticker is appended as a path segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// The chart endpoint rejects requests without a browser-like agent.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// =============================================================================
// DashboardConfig
// =============================================================================

/// Process-wide configuration. Read-only once the server is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    // --- Dropdown & defaults -------------------------------------------------

    /// Tickers offered in the dropdown.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<TickerOption>,

    /// Ticker used when a request names none.
    #[serde(default = "default_ticker")]
    pub default_ticker: String,

    /// Start date used when a request names none.
    #[serde(default = "default_start_date")]
    pub default_start_date: NaiveDate,

    // --- Table ---------------------------------------------------------------

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    // --- Indicators ----------------------------------------------------------

    #[serde(default = "default_bollinger_window")]
    pub bollinger_window: usize,

    /// Band distance in standard deviations.
    #[serde(default = "default_bollinger_num_std")]
    pub bollinger_num_std: f64,

    #[serde(default = "default_stoch_k_window")]
    pub stoch_k_window: usize,

    #[serde(default = "default_stoch_d_window")]
    pub stoch_d_window: usize,

    /// Fail chart requests whose series is shorter than a selected
    /// indicator's window instead of drawing empty lines.
    #[serde(default)]
    pub strict_history: bool,

    // --- Server & provider ---------------------------------------------------

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            default_ticker: default_ticker(),
            default_start_date: default_start_date(),
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            bollinger_window: default_bollinger_window(),
            bollinger_num_std: default_bollinger_num_std(),
            stoch_k_window: default_stoch_k_window(),
            stoch_d_window: default_stoch_d_window(),
            strict_history: false,
            bind_addr: default_bind_addr(),
            provider: ProviderConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse dashboard config from {}", path.display()))?;

        info!(
            path = %path.display(),
            tickers = config.tickers.len(),
            default_ticker = %config.default_ticker,
            "dashboard config loaded"
        );

        Ok(config)
    }

    /// Apply `DASHBOARD_BIND_ADDR` and `DASHBOARD_TICKERS` from the
    /// environment. Tickers are comma-separated symbols labelled by symbol.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("DASHBOARD_BIND_ADDR") {
            if !addr.trim().is_empty() {
                self.bind_addr = addr.trim().to_string();
            }
        }
        if let Ok(list) = std::env::var("DASHBOARD_TICKERS") {
            self.set_tickers_from_list(&list);
        }
    }

    fn set_tickers_from_list(&mut self, list: &str) {
        let tickers: Vec<TickerOption> = list
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .map(|s| TickerOption::new(s.clone(), s))
            .collect();
        if tickers.is_empty() {
            return;
        }
        if !tickers.iter().any(|t| t.symbol == self.default_ticker) {
            self.default_ticker = tickers[0].symbol.clone();
        }
        self.tickers = tickers;
    }

    pub fn indicator_params(&self) -> IndicatorParams {
        IndicatorParams {
            bollinger_window: self.bollinger_window,
            bollinger_num_std: self.bollinger_num_std,
            stoch_k_window: self.stoch_k_window,
            stoch_d_window: self.stoch_d_window,
        }
    }
}
