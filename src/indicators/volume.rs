use chrono::NaiveDate;
use serde::Serialize;

use crate::types::Series;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub volume: u64,
}

/// Traded volume per session, in series order.
pub fn volume_trace(series: &Series) -> Vec<VolumePoint> {
    series
        .rows()
        .iter()
        .map(|r| VolumePoint {
            date: r.date,
            volume: r.volume,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OhlcvRow;

    #[test]
    fn projects_volume_in_chronological_order() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let row = |day, volume| OhlcvRow {
            date: d(day),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            adj_close: Some(1.0),
            volume,
        };
        let series = Series::new("X", vec![row(5, 500), row(4, 400)]);
        let trace = volume_trace(&series);
        assert_eq!(
            trace,
            vec![
                VolumePoint { date: d(4), volume: 400 },
                VolumePoint { date: d(5), volume: 500 },
            ]
        );
    }
}
