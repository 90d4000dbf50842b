// =============================================================================
// Market data access
// =============================================================================

use std::future::Future;

use crate::error::DashboardError;
use crate::types::{DateRange, OhlcvRow};

pub mod yahoo;

#[cfg(test)]
pub mod fixture;

pub use yahoo::YahooClient;

/// Source of daily OHLCV history.
///
/// Implementations return rows inside `range` with prices rounded to one
/// decimal, in any order. Every failure is reported as
/// `DashboardError::DataUnavailable`.
pub trait PriceSource: Send + Sync + 'static {
    fn fetch_daily(
        &self,
        ticker: &str,
        range: &DateRange,
    ) -> impl Future<Output = Result<Vec<OhlcvRow>, DashboardError>> + Send;
}
