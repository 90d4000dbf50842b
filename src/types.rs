// =============================================================================
// Shared types used across the dashboard
// =============================================================================

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// One trading day of price history for a single ticker.
///
/// Field names serialise as the table column headers shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Adj Close", default)]
    pub adj_close: Option<f64>,
    #[serde(rename = "Volume")]
    pub volume: u64,
}

/// Column headers in table order.
pub const TABLE_COLUMNS: [&str; 7] =
    ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// Round a price to one decimal place, ties to even.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

// =============================================================================
// Series
// =============================================================================

/// Price history for one ticker, held in ascending date order.
///
/// Rolling-window indicators depend on chronological order, so the
/// constructor sorts and drops duplicate dates (first occurrence wins).
#[derive(Debug, Clone)]
pub struct Series {
    pub ticker: String,
    rows: Vec<OhlcvRow>,
}

impl Series {
    pub fn new(ticker: impl Into<String>, mut rows: Vec<OhlcvRow>) -> Self {
        rows.sort_by_key(|r| r.date);
        rows.dedup_by_key(|r| r.date);
        Self {
            ticker: ticker.into(),
            rows,
        }
    }

    /// Rows oldest first.
    pub fn rows(&self) -> &[OhlcvRow] {
        &self.rows
    }

    /// Rows newest first, as the table shows them.
    pub fn descending(&self) -> Vec<OhlcvRow> {
        self.rows.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.low).collect()
    }
}

// =============================================================================
// Date range
// =============================================================================

/// Inclusive calendar range for a history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }
}

/// Parse a user-entered date. Accepts `YYYY-MM-DD`, optionally followed by a
/// whitespace-separated time part which is ignored.
pub fn parse_date(input: &str) -> Result<NaiveDate, DashboardError> {
    let day = input.split_whitespace().next().unwrap_or("");
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| DashboardError::InvalidDate(input.to_string()))
}

// =============================================================================
// Indicator selection
// =============================================================================

/// Chart overlays the user can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Indicator {
    Volume,
    Bollinger,
    Stoch,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::Volume, Indicator::Bollinger, Indicator::Stoch];

    /// Label shown next to the checkbox.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Volume => "Volume",
            Self::Bollinger => "Bollinger Bands",
            Self::Stoch => "Stochastic Oscillator",
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Volume => write!(f, "Volume"),
            Self::Bollinger => write!(f, "Bollinger"),
            Self::Stoch => write!(f, "Stoch"),
        }
    }
}

impl FromStr for Indicator {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "volume" => Ok(Self::Volume),
            "bollinger" | "bollingerbands" => Ok(Self::Bollinger),
            "stoch" | "stochastic" | "stochasticoscillator" => Ok(Self::Stoch),
            _ => Err(DashboardError::InvalidIndicator(s.trim().to_string())),
        }
    }
}

/// Zero or more selected indicators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorSet(BTreeSet<Indicator>);

impl IndicatorSet {
    pub fn contains(&self, indicator: Indicator) -> bool {
        self.0.contains(&indicator)
    }

    /// Parse a comma-separated list such as `Volume,Bollinger`. Blank
    /// entries are skipped; an empty string selects nothing.
    pub fn parse_list(list: &str) -> Result<Self, DashboardError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Indicator::from_str)
            .collect()
    }
}

impl FromIterator<Indicator> for IndicatorSet {
    fn from_iter<I: IntoIterator<Item = Indicator>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn row(d: u32, close: f64) -> OhlcvRow {
        OhlcvRow {
            date: day(d),
            open: close,
            high: close,
            low: close,
            close,
            adj_close: None,
            volume: 100,
        }
    }

    #[test]
    fn series_sorts_ascending_and_dedups() {
        let s = Series::new("X", vec![row(3, 3.0), row(1, 1.0), row(2, 2.0), row(1, 9.0)]);
        assert_eq!(s.dates(), vec![day(1), day(2), day(3)]);
        assert_eq!(s.descending()[0].date, day(3));
    }

    #[test]
    fn round1_rounds_to_one_decimal() {
        assert_eq!(round1(1.26), 1.3);
        assert_eq!(round1(1.24), 1.2);
        assert_eq!(round1(-3.06), -3.1);
    }

    #[test]
    fn round1_ties_go_to_even() {
        // NSE prices tick in 0.05, so exact halves are common.
        assert_eq!(round1(1.25), 1.2);
        assert_eq!(round1(1.75), 1.8);
        assert_eq!(round1(0.05), 0.0);
        assert_eq!(round1(1510.25), 1510.2);
    }

    #[test]
    fn date_range_rejects_inverted() {
        assert!(DateRange::new(day(1), day(1)).is_ok());
        assert!(matches!(
            DateRange::new(day(5), day(2)),
            Err(DashboardError::InvalidRange { .. })
        ));
    }

    #[test]
    fn parse_date_ignores_time_part() {
        assert_eq!(parse_date("2024-01-05").unwrap(), day(5));
        assert_eq!(parse_date(" 2024-01-05 13:45:00.123 ").unwrap(), day(5));
        assert!(matches!(parse_date("05/01/2024"), Err(DashboardError::InvalidDate(_))));
        assert!(parse_date("").is_err());
    }

    #[test]
    fn indicator_names_are_lenient() {
        assert_eq!("Volume".parse::<Indicator>().unwrap(), Indicator::Volume);
        assert_eq!("bollinger_bands".parse::<Indicator>().unwrap(), Indicator::Bollinger);
        assert_eq!("Stochastic Oscillator".parse::<Indicator>().unwrap(), Indicator::Stoch);
        assert!(matches!(
            "macd".parse::<Indicator>(),
            Err(DashboardError::InvalidIndicator(_))
        ));
    }

    #[test]
    fn indicator_set_parses_lists() {
        let set = IndicatorSet::parse_list("Volume, Stoch,,").unwrap();
        assert!(set.contains(Indicator::Volume));
        assert!(set.contains(Indicator::Stoch));
        assert!(!set.contains(Indicator::Bollinger));
        assert_eq!(IndicatorSet::parse_list("").unwrap(), IndicatorSet::default());
        assert!(IndicatorSet::parse_list("Volume,RSI").is_err());
    }
}
