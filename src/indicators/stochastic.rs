// =============================================================================
// Stochastic Oscillator (%K / %D)
// =============================================================================
//
// %K compares the close to the trailing high-low range:
//   %K = 100 * (close - lowest_low(k)) / (highest_high(k) - lowest_low(k))
// %D is the simple moving average of %K over `d` sessions.
//
// When the trailing range is flat (highest high == lowest low) %K has no
// meaning and is reported as `None`; any %D window touching it is `None` too.
// =============================================================================

use super::rolling::{lift, rolling_max, rolling_mean, rolling_min};
use super::{zip_points, Point};
use crate::types::Series;

#[derive(Debug, Clone)]
pub struct Stochastic {
    pub percent_k: Vec<Point>,
    pub percent_d: Vec<Point>,
}

/// Compute %K over `k_window` sessions and %D over `d_window` values of %K.
pub fn stochastic_oscillator(series: &Series, k_window: usize, d_window: usize) -> Stochastic {
    let dates = series.dates();
    let closes = series.closes();
    let lowest = rolling_min(&lift(&series.lows()), k_window);
    let highest = rolling_max(&lift(&series.highs()), k_window);

    let percent_k: Vec<Option<f64>> = closes
        .iter()
        .zip(lowest.iter().zip(&highest))
        .map(|(&close, (lo, hi))| {
            let (lo, hi) = ((*lo)?, (*hi)?);
            let range = hi - lo;
            if range == 0.0 {
                return None;
            }
            Some(100.0 * (close - lo) / range).filter(|k| k.is_finite())
        })
        .collect();
    let percent_d = rolling_mean(&percent_k, d_window);

    Stochastic {
        percent_k: zip_points(&dates, percent_k),
        percent_d: zip_points(&dates, percent_d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OhlcvRow;
    use chrono::{Duration, NaiveDate};

    fn series(bars: &[(f64, f64, f64)]) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, &(high, low, close))| OhlcvRow {
                date: start + Duration::days(i as i64),
                open: close,
                high,
                low,
                close,
                adj_close: None,
                volume: 10,
            })
            .collect();
        Series::new("TEST", rows)
    }

    fn wavy(n: usize) -> Series {
        let bars: Vec<(f64, f64, f64)> = (0..n)
            .map(|i| {
                let mid = 100.0 + (i as f64 * 0.45).sin() * 8.0;
                (mid + 2.0, mid - 2.0, mid + (i as f64 * 1.3).cos() * 1.5)
            })
            .collect();
        series(&bars)
    }

    #[test]
    fn warmup_lengths() {
        let st = stochastic_oscillator(&wavy(30), 14, 3);
        assert!(st.percent_k[..13].iter().all(|p| p.value.is_none()));
        assert!(st.percent_k[13..].iter().all(|p| p.value.is_some()));
        assert!(st.percent_d[..15].iter().all(|p| p.value.is_none()));
        assert!(st.percent_d[15..].iter().all(|p| p.value.is_some()));
    }

    #[test]
    fn percent_k_stays_in_range() {
        let st = stochastic_oscillator(&wavy(120), 14, 3);
        for p in st.percent_k.iter().chain(&st.percent_d) {
            if let Some(v) = p.value {
                assert!((0.0..=100.0).contains(&v), "value {v} out of range");
            }
        }
    }

    #[test]
    fn percent_k_known_value() {
        // Window of 3: lows 8,9,7 -> 7; highs 12,11,13 -> 13; close 10.
        let bars = series(&[(12.0, 8.0, 10.0), (11.0, 9.0, 10.0), (13.0, 7.0, 10.0)]);
        let st = stochastic_oscillator(&bars, 3, 1);
        let k = st.percent_k[2].value.unwrap();
        assert!((k - 50.0).abs() < 1e-12);
        assert_eq!(st.percent_d[2].value, Some(k));
    }

    #[test]
    fn percent_d_is_mean_of_k() {
        let st = stochastic_oscillator(&wavy(40), 14, 3);
        for i in 15..40 {
            let expected = (st.percent_k[i - 2].value.unwrap()
                + st.percent_k[i - 1].value.unwrap()
                + st.percent_k[i].value.unwrap())
                / 3.0;
            assert!((st.percent_d[i].value.unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn flat_range_is_undefined_not_a_crash() {
        let st = stochastic_oscillator(&series(&[(50.0, 50.0, 50.0); 20]), 14, 3);
        assert!(st.percent_k.iter().all(|p| p.value.is_none()));
        assert!(st.percent_d.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn flat_stretch_only_blanks_affected_points() {
        let mut bars = vec![(50.0, 50.0, 50.0); 5];
        bars.extend([(55.0, 49.0, 52.0), (56.0, 50.0, 53.0)]);
        let st = stochastic_oscillator(&series(&bars), 3, 2);
        assert!(st.percent_k[4].value.is_none());
        assert!(st.percent_k[5].value.is_some());
        assert!(st.percent_d[5].value.is_none());
        assert!(st.percent_d[6].value.is_some());
    }
}
