// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator series over a chronologically ordered
// `Series`. Every output is aligned one-to-one with the input rows; points
// without enough history carry `None` instead of a sentinel value.

use chrono::NaiveDate;
use serde::Serialize;

pub mod bollinger;
pub mod rolling;
pub mod stochastic;
pub mod volume;

pub use bollinger::bollinger_bands;
pub use stochastic::stochastic_oscillator;
pub use volume::volume_trace;

/// One derived value aligned to a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Zip dates with computed values into aligned points.
pub(crate) fn zip_points(dates: &[NaiveDate], values: Vec<Option<f64>>) -> Vec<Point> {
    dates
        .iter()
        .zip(values)
        .map(|(&date, value)| Point { date, value })
        .collect()
}

/// Window lengths for the window-based indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorParams {
    pub bollinger_window: usize,
    pub bollinger_num_std: f64,
    pub stoch_k_window: usize,
    pub stoch_d_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            bollinger_window: 20,
            bollinger_num_std: 2.0,
            stoch_k_window: 14,
            stoch_d_window: 3,
        }
    }
}
