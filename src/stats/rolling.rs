//! Daily rental trend: calendar reindexing, linear gap filling and a trailing mean.

use super::mean;
use crate::data::DailyRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Selectable rolling window lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RollingWindow {
    Week,
    #[default]
    Month,
}

impl RollingWindow {
    pub const ALL: [RollingWindow; 2] = [RollingWindow::Week, RollingWindow::Month];

    pub fn days(&self) -> usize {
        match self {
            RollingWindow::Week => 7,
            RollingWindow::Month => 30,
        }
    }

    pub fn from_days(days: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.days() == days)
    }
}

/// Raw (interpolated) and rolling series over a gap-free daily index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RollingSeries {
    pub window: usize,
    pub dates: Vec<NaiveDate>,
    pub raw: Vec<f64>,
    pub rolling: Vec<f64>,
}

impl RollingSeries {
    /// Build the series from daily rows in any order.
    ///
    /// Every date between the first and last observation is present. Missing
    /// days are linearly interpolated between their neighbours. The rolling
    /// mean at day `i` covers the last `window` days up to `i`, or fewer at
    /// the start of the series. A `window` of 0 is treated as 1.
    pub fn compute(rows: &[DailyRecord], window: usize) -> Self {
        let window = window.max(1);

        let mut observed: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for row in rows {
            observed.entry(row.date).or_default().push(f64::from(row.count));
        }
        let observed: Vec<(NaiveDate, f64)> = observed
            .into_iter()
            .map(|(date, counts)| (date, mean(&counts)))
            .collect();

        let (Some(&(first, _)), Some(&(last, _))) = (observed.first(), observed.last()) else {
            return Self {
                window,
                ..Self::default()
            };
        };

        let dates: Vec<NaiveDate> = first.iter_days().take_while(|d| *d <= last).collect();
        let raw = interpolate(&observed, &dates);
        let rolling = trailing_mean(&raw, window);

        Self {
            window,
            dates,
            raw,
            rolling,
        }
    }
}

/// Fill `calendar` from sorted `observed` points, linear in elapsed days.
fn interpolate(observed: &[(NaiveDate, f64)], calendar: &[NaiveDate]) -> Vec<f64> {
    let mut out = Vec::with_capacity(calendar.len());
    let mut next = 0;

    for &day in calendar {
        while next < observed.len() && observed[next].0 < day {
            next += 1;
        }
        let value = match observed.get(next) {
            Some(&(date, value)) if date == day => value,
            Some(&(right_date, right)) if next > 0 => {
                let (left_date, left) = observed[next - 1];
                let span = (right_date - left_date).num_days() as f64;
                let offset = (day - left_date).num_days() as f64;
                left + (right - left) * offset / span
            }
            // The calendar spans first..=last observation, so this is unreachable.
            _ => observed.last().map(|&(_, v)| v).unwrap_or(0.0),
        };
        out.push(value);
    }

    out
}

fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(&values[start..=i])
        })
        .collect()
}
