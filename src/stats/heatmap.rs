//! Weekday x hour grid of mean hourly rentals.

use super::mean;
use crate::data::{HourlyRecord, Weekday};
use serde::Serialize;

pub const HOURS: usize = 24;

/// Mean `count` per (weekday, hour). Rows are Monday..Sunday, columns 0..23.
/// Cells without observations hold 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayHourGrid {
    pub values: Vec<[f64; HOURS]>,
    pub observations: usize,
}

impl Default for WeekdayHourGrid {
    fn default() -> Self {
        Self {
            values: vec![[0.0; HOURS]; Weekday::ALL.len()],
            observations: 0,
        }
    }
}

impl WeekdayHourGrid {
    pub fn compute(rows: &[HourlyRecord]) -> Self {
        let mut cells: Vec<Vec<Vec<f64>>> = vec![vec![Vec::new(); HOURS]; Weekday::ALL.len()];
        for row in rows {
            cells[row.weekday.index()][usize::from(row.hour)].push(f64::from(row.count));
        }

        let values = cells
            .iter()
            .map(|hours| {
                let mut out = [0.0; HOURS];
                for (hour, counts) in hours.iter().enumerate() {
                    out[hour] = mean(counts);
                }
                out
            })
            .collect();

        Self {
            values,
            observations: rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Season;
    use chrono::NaiveDate;

    fn row(weekday: Weekday, hour: u8, count: u32) -> HourlyRecord {
        HourlyRecord {
            date: NaiveDate::from_ymd_opt(2011, 1, 3).unwrap(),
            hour,
            year: 2011,
            season: Season::Spring,
            weekday,
            weather: None,
            count,
            casual: 0,
            registered: count,
        }
    }

    #[test]
    fn test_mean_per_cell() {
        let grid = WeekdayHourGrid::compute(&[
            row(Weekday::Monday, 8, 100),
            row(Weekday::Monday, 8, 300),
            row(Weekday::Sunday, 14, 50),
        ]);
        assert_eq!(grid.values[Weekday::Monday.index()][8], 200.0);
        assert_eq!(grid.values[Weekday::Sunday.index()][14], 50.0);
        assert_eq!(grid.observations, 3);
    }

    #[test]
    fn test_missing_cell_is_zero() {
        let grid = WeekdayHourGrid::compute(&[row(Weekday::Sunday, 4, 12)]);
        assert_eq!(grid.values.len(), 7);
        assert_eq!(grid.values[6][3], 0.0);
        assert!(grid.values.iter().flatten().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_empty_grid() {
        let grid = WeekdayHourGrid::compute(&[]);
        assert_eq!(grid.observations, 0);
        assert_eq!(grid, WeekdayHourGrid::default());
    }
}
