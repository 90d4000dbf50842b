// =============================================================================
// Stock Dashboard — Main Entry Point
// =============================================================================
//
// Serves a single-page dashboard: ticker dropdown, date range, paginated
// price table and a candlestick chart with optional Volume, Bollinger Bands
// and Stochastic Oscillator panels. Every interaction fetches fresh history.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod chart;
mod dashboard;
mod error;
mod indicators;
mod market_data;
mod pagination;
mod runtime_config;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::dashboard::Dashboard;
use crate::market_data::YahooClient;
use crate::runtime_config::DashboardConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Stock Dashboard starting up");

    let config_path =
        std::env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| "dashboard_config.json".into());
    let mut config = DashboardConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        DashboardConfig::default()
    });
    config.apply_env_overrides();

    info!(
        tickers = ?config.tickers.iter().map(|t| t.symbol.as_str()).collect::<Vec<_>>(),
        default_ticker = %config.default_ticker,
        default_start = %config.default_start_date,
        "Configured dashboard"
    );

    // ── 2. Market data client ────────────────────────────────────────────
    let client = YahooClient::new(&config.provider)?;

    // ── 3. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(Dashboard::new(client, config)));

    // ── 4. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "Dashboard listening");

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("Stock Dashboard shut down complete.");
    Ok(())
}
