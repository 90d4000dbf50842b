// =============================================================================
// Trailing-window helpers
// =============================================================================
//
// Every helper returns one output per input. Output `i` is computed from the
// window `values[i + 1 - window ..= i]` and is `None` when:
//   - fewer than `window` values precede it (inclusive),
//   - any value in the window is `None`,
//   - the reduction itself is undefined or non-finite.
// =============================================================================

/// Lift a plain slice into the optional form the helpers consume.
pub fn lift(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Apply `reduce` to every complete trailing window.
pub fn rolling_apply<F>(values: &[Option<f64>], window: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut buf = Vec::with_capacity(window);
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            buf.clear();
            for v in &values[i + 1 - window..=i] {
                buf.push((*v)?);
            }
            reduce(&buf).filter(|x| x.is_finite())
        })
        .collect()
}

pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, mean)
}

/// Sample standard deviation (n - 1 denominator). Undefined for `window < 2`.
pub fn rolling_sample_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| {
        if w.len() < 2 {
            return None;
        }
        let m = mean(w)?;
        let ss: f64 = w.iter().map(|x| (x - m).powi(2)).sum();
        Some((ss / (w.len() - 1) as f64).sqrt())
    })
}

pub fn rolling_min(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| w.iter().copied().reduce(f64::min))
}

pub fn rolling_max(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| w.iter().copied().reduce(f64::max))
}

fn mean(w: &[f64]) -> Option<f64> {
    if w.is_empty() {
        return None;
    }
    Some(w.iter().sum::<f64>() / w.len() as f64)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_zero_is_all_undefined() {
        assert_eq!(rolling_mean(&lift(&[1.0, 2.0]), 0), vec![None, None]);
    }

    #[test]
    fn warmup_points_are_undefined() {
        let out = rolling_mean(&lift(&[1.0, 2.0, 3.0, 4.0]), 3);
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn gap_poisons_windows_that_contain_it() {
        let values = vec![Some(1.0), None, Some(3.0), Some(5.0), Some(7.0)];
        let out = rolling_mean(&values, 2);
        assert_eq!(out, vec![None, None, None, Some(4.0), Some(6.0)]);
    }

    #[test]
    fn sample_std_matches_hand_calculation() {
        // Values 2,4,4,4,5,5,7,9: mean 5, sum of squares 32, sample var 32/7.
        let values = lift(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let out = rolling_sample_std(&values, 8);
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((out[7].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn sample_std_undefined_for_single_value_window() {
        assert_eq!(rolling_sample_std(&lift(&[1.0, 2.0]), 1), vec![None, None]);
    }

    #[test]
    fn min_max_track_window() {
        let values = lift(&[5.0, 1.0, 4.0, 2.0, 8.0]);
        assert_eq!(rolling_min(&values, 3), vec![None, None, Some(1.0), Some(1.0), Some(2.0)]);
        assert_eq!(rolling_max(&values, 3), vec![None, None, Some(5.0), Some(4.0), Some(8.0)]);
    }

    #[test]
    fn non_finite_results_are_dropped() {
        let values = lift(&[f64::MAX, f64::MAX]);
        assert_eq!(rolling_mean(&values, 2), vec![None, None]);
    }
}
