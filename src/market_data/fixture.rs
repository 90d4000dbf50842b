//! In-memory `PriceSource` for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, NaiveDate};

use super::PriceSource;
use crate::error::DashboardError;
use crate::types::{DateRange, OhlcvRow};

#[derive(Default)]
pub struct StaticSource {
    histories: HashMap<String, Vec<OhlcvRow>>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn with(mut self, ticker: &str, rows: Vec<OhlcvRow>) -> Self {
        self.histories.insert(ticker.to_string(), rows);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PriceSource for StaticSource {
    async fn fetch_daily(
        &self,
        ticker: &str,
        range: &DateRange,
    ) -> Result<Vec<OhlcvRow>, DashboardError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let rows = self
            .histories
            .get(ticker)
            .ok_or_else(|| DashboardError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: "Not Found: No data found, symbol may be delisted".to_string(),
            })?;
        Ok(rows
            .iter()
            .filter(|r| r.date >= range.start && r.date <= range.end)
            .cloned()
            .collect())
    }
}

/// `n` consecutive daily rows starting at `start`, with a gentle oscillation
/// so window indicators have a non-flat range.
pub fn daily_rows(start: NaiveDate, n: usize) -> Vec<OhlcvRow> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i % 9) as f64 - 4.0;
            OhlcvRow {
                date: start + Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.5,
                low: close - 1.5,
                close,
                adj_close: Some(close - 0.2),
                volume: 10_000 + 100 * i as u64,
            }
        })
        .collect()
}
