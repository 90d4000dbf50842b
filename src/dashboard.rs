// =============================================================================
// Dashboard service — the two request-level operations
// =============================================================================
//
// `get_page` feeds the table, `get_chart_data` feeds the chart. Both resolve
// the ticker and date range per call, fetch the full history fresh from the
// source, and compute everything from scratch. Nothing is cached.
// =============================================================================

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::chart::{assemble_chart, ChartData};
use crate::error::DashboardError;
use crate::market_data::PriceSource;
use crate::pagination::{paginate, Page};
use crate::runtime_config::{DashboardConfig, TickerOption};
use crate::types::{parse_date, DateRange, Indicator, IndicatorSet, Series};

/// Ticker and date inputs as typed by the user. Blank means "use the default".
#[derive(Debug, Clone, Default)]
pub struct HistoryRequest {
    pub ticker: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Static choices and defaults the page needs to render its controls.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOptions {
    pub tickers: Vec<TickerOption>,
    pub default_ticker: String,
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
    pub page_size: usize,
    pub indicators: Vec<IndicatorOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorOption {
    pub label: &'static str,
    pub value: Indicator,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

pub struct Dashboard<S> {
    source: S,
    config: DashboardConfig,
    today: fn() -> NaiveDate,
}

impl<S: PriceSource> Dashboard<S> {
    pub fn new(source: S, config: DashboardConfig) -> Self {
        Self {
            source,
            config,
            today: local_today,
        }
    }

    /// Replace the clock used for the default end date.
    #[cfg(test)]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn resolve_ticker(&self, ticker: Option<&str>) -> String {
        non_blank(ticker)
            .map(str::to_uppercase)
            .unwrap_or_else(|| self.config.default_ticker.clone())
    }

    /// Effective range: missing start falls back to the configured start,
    /// missing end to today (evaluated now, not at startup).
    pub fn resolve_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<DateRange, DashboardError> {
        let start = match non_blank(start) {
            Some(s) => parse_date(s)?,
            None => self.config.default_start_date,
        };
        let end = match non_blank(end) {
            Some(s) => parse_date(s)?,
            None => (self.today)(),
        };
        DateRange::new(start, end)
    }

    async fn fetch_series(&self, request: &HistoryRequest) -> Result<Series, DashboardError> {
        let ticker = self.resolve_ticker(request.ticker.as_deref());
        let range = self.resolve_range(request.start.as_deref(), request.end.as_deref())?;
        let rows = self.source.fetch_daily(&ticker, &range).await?;
        let series = Series::new(ticker, rows);
        if series.is_empty() {
            debug!(
                ticker = %series.ticker,
                start = %range.start,
                end = %range.end,
                "no sessions in range"
            );
        } else {
            debug!(ticker = %series.ticker, rows = series.len(), "history loaded");
        }
        Ok(series)
    }

    /// One page of the newest-first table.
    #[instrument(skip(self))]
    pub async fn get_page(
        &self,
        request: &HistoryRequest,
        page_current: usize,
        page_size: Option<usize>,
    ) -> Result<Page, DashboardError> {
        let page_size = page_size.unwrap_or(self.config.page_size);
        // Reject a bad page size before spending a fetch on it.
        if page_size == 0 || page_size > self.config.max_page_size {
            return Err(DashboardError::InvalidPageSize {
                size: page_size,
                max: self.config.max_page_size,
            });
        }
        let series = self.fetch_series(request).await?;
        paginate(&series.descending(), page_current, page_size, self.config.max_page_size)
    }

    /// Candlestick figure with the selected overlays.
    #[instrument(skip(self))]
    pub async fn get_chart_data(
        &self,
        request: &HistoryRequest,
        indicators: &IndicatorSet,
    ) -> Result<ChartData, DashboardError> {
        let series = self.fetch_series(request).await?;
        assemble_chart(
            &series,
            indicators,
            &self.config.indicator_params(),
            self.config.strict_history,
        )
    }

    pub fn options(&self) -> DashboardOptions {
        DashboardOptions {
            tickers: self.config.tickers.clone(),
            default_ticker: self.config.default_ticker.clone(),
            default_start: self.config.default_start_date,
            default_end: (self.today)(),
            page_size: self.config.page_size,
            indicators: Indicator::ALL
                .into_iter()
                .map(|value| IndicatorOption {
                    label: value.label(),
                    value,
                })
                .collect(),
        }
    }
}
