// =============================================================================
// Dashboard error kinds
// =============================================================================

use chrono::NaiveDate;

use crate::types::Indicator;

/// Errors surfaced to the user for a single dashboard request.
///
/// Provider failures of every flavour (network, timeout, unknown ticker,
/// malformed payload) collapse into `DataUnavailable`.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown indicator '{0}'")]
    InvalidIndicator(String),

    #[error("page size {size} must be between 1 and {max}")]
    InvalidPageSize { size: usize, max: usize },

    #[error("no data available for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("{indicator} needs {required} sessions of history, only {available} available")]
    InsufficientHistory {
        indicator: Indicator,
        required: usize,
        available: usize,
    },
}
