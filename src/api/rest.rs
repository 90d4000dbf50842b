// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// The HTML page lives at `/`; everything it calls lives under `/api/v1/`.
// All endpoints are read-only and stateless apart from the request counter.
//
// CORS is configured permissively so the page can also be served elsewhere.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::error::ApiError;
use crate::app_state::AppState;
use crate::chart::ChartData;
use crate::dashboard::HistoryRequest;
use crate::market_data::PriceSource;
use crate::pagination::Page;
use crate::types::IndicatorSet;

const INDEX_HTML: &str = include_str!("../../static/index.html");

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS and request tracing.
pub fn router<S: PriceSource>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/v1/health", get(health::<S>))
        .route("/api/v1/options", get(options::<S>))
        .route("/api/v1/table", get(table::<S>))
        .route("/api/v1/chart", get(chart::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    requests_served: u64,
    uptime_secs: u64,
    server_time: i64,
}

async fn health<S: PriceSource>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        requests_served: state.requests_served(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Options (dropdown, checklist, defaults)
// =============================================================================

async fn options<S: PriceSource>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    Json(state.dashboard.options())
}

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Deserialize)]
struct TableQuery {
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    page: usize,
    #[serde(default)]
    page_size: Option<usize>,
}

async fn table<S: PriceSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(q): Query<TableQuery>,
) -> Result<Json<Page>, ApiError> {
    state.record_request();
    let request = HistoryRequest {
        ticker: q.ticker,
        start: q.start,
        end: q.end,
    };
    let page = state.dashboard.get_page(&request, q.page, q.page_size).await?;
    Ok(Json(page))
}

// =============================================================================
// Chart
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartQuery {
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    /// Comma-separated, e.g. `Volume,Bollinger,Stoch`.
    #[serde(default)]
    indicators: String,
}

async fn chart<S: PriceSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(q): Query<ChartQuery>,
) -> Result<Json<ChartData>, ApiError> {
    state.record_request();
    let indicators = IndicatorSet::parse_list(&q.indicators)?;
    let request = HistoryRequest {
        ticker: q.ticker,
        start: q.start,
        end: q.end,
    };
    let chart = state.dashboard.get_chart_data(&request, &indicators).await?;
    Ok(Json(chart))
}
