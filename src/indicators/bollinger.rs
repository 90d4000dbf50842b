// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), all over a trailing window of closes.
//
// σ is the sample standard deviation (n - 1 denominator).
// =============================================================================

use super::rolling::{lift, rolling_mean, rolling_sample_std};
use super::{zip_points, Point};
use crate::types::Series;

/// Upper, middle and lower bands, each aligned to the input series.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<Point>,
    pub middle: Vec<Point>,
    pub lower: Vec<Point>,
}

/// Calculate Bollinger Bands over the closes of `series`.
///
/// - `middle[i]` = mean of the `window` closes ending at `i`
/// - `upper[i]`  = middle + `num_std` * σ
/// - `lower[i]`  = middle - `num_std` * σ
///
/// The first `window - 1` points are `None`. With `window < 2` σ is undefined,
/// so both outer bands are `None` everywhere.
pub fn bollinger_bands(series: &Series, window: usize, num_std: f64) -> BollingerBands {
    let dates = series.dates();
    let closes = lift(&series.closes());

    let middle = rolling_mean(&closes, window);
    let std_dev = rolling_sample_std(&closes, window);

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&std_dev)
            .map(|(m, s)| Some((*m)? + sign * num_std * (*s)?))
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    BollingerBands {
        upper: zip_points(&dates, upper),
        middle: zip_points(&dates, middle),
        lower: zip_points(&dates, lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OhlcvRow;
    use chrono::{Duration, NaiveDate};

    fn series_from_closes(closes: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvRow {
                date: start + Duration::days(i as i64),
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                adj_close: None,
                volume: 1_000,
            })
            .collect();
        Series::new("TEST", rows)
    }

    const TWENTY: [f64; 20] = [
        10.0, 12.0, 11.0, 13.0, 9.0, 14.0, 15.0, 10.0, 12.0, 11.0, 13.0, 14.0, 16.0, 15.0, 13.0,
        12.0, 11.0, 10.0, 14.0, 15.0,
    ];

    #[test]
    fn exactly_one_point_for_window_sized_series() {
        let bb = bollinger_bands(&series_from_closes(&TWENTY), 20, 2.0);
        let defined: Vec<usize> = bb
            .middle
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.value.map(|_| i))
            .collect();
        assert_eq!(defined, vec![19]);
        assert!((bb.middle[19].value.unwrap() - 12.5).abs() < 1e-12);
        assert!(bb.upper[18].value.is_none());
        assert!(bb.lower[18].value.is_none());
    }

    #[test]
    fn middle_is_trailing_mean() {
        let closes: Vec<f64> = (1..=40).map(|x| (x as f64 * 0.7).sin() * 10.0 + 50.0).collect();
        let w = 20;
        let bb = bollinger_bands(&series_from_closes(&closes), w, 2.0);
        for i in 0..closes.len() {
            if i + 1 < w {
                assert!(bb.middle[i].value.is_none());
            } else {
                let expected = closes[i + 1 - w..=i].iter().sum::<f64>() / w as f64;
                assert!((bb.middle[i].value.unwrap() - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn band_width_is_four_sigma() {
        let closes: Vec<f64> = (1..=60).map(|x| 100.0 + ((x * 7) % 13) as f64).collect();
        let series = series_from_closes(&closes);
        let bb = bollinger_bands(&series, 20, 2.0);
        let sigma = rolling_sample_std(&lift(&closes), 20);
        for i in 0..closes.len() {
            match (bb.upper[i].value, bb.lower[i].value, sigma[i]) {
                (Some(u), Some(l), Some(s)) => assert!((u - l - 4.0 * s).abs() < 1e-9),
                (None, None, None) => assert!(i < 19),
                other => panic!("misaligned bands at {i}: {other:?}"),
            }
        }
    }

    #[test]
    fn flat_closes_collapse_the_bands() {
        let bb = bollinger_bands(&series_from_closes(&[100.0; 25]), 20, 2.0);
        let last = bb.upper.len() - 1;
        assert_eq!(bb.upper[last].value, Some(100.0));
        assert_eq!(bb.lower[last].value, Some(100.0));
    }

    #[test]
    fn short_series_is_all_undefined() {
        let bb = bollinger_bands(&series_from_closes(&[1.0, 2.0, 3.0]), 20, 2.0);
        assert_eq!(bb.middle.len(), 3);
        assert!(bb.middle.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn points_carry_series_dates() {
        let series = series_from_closes(&TWENTY);
        let bb = bollinger_bands(&series, 20, 2.0);
        assert_eq!(bb.upper.iter().map(|p| p.date).collect::<Vec<_>>(), series.dates());
    }
}
