//! Hourly rentals by user type, grouped by (year, hour).

use super::mean;
use crate::data::{DataProcessor, HourlyRecord, LongRow, UserTypeValues};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How casual/registered values are combined within a (year, hour) group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    /// Typical hour.
    #[default]
    Mean,
    /// Total volume.
    Sum,
}

impl Reducer {
    pub fn label(&self) -> &'static str {
        match self {
            Reducer::Mean => "Mean (typical hour)",
            Reducer::Sum => "Sum (total volume)",
        }
    }

    pub fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Reducer::Mean => mean(values),
            Reducer::Sum => values.iter().sum(),
        }
    }
}

/// Render mode for the hourly chart. Same data, different panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum HourlyLayout {
    /// One panel per year.
    #[default]
    PerYear,
    /// One panel, years told apart by line style.
    Combined,
}

impl HourlyLayout {
    pub fn label(&self) -> &'static str {
        match self {
            HourlyLayout::PerYear => "Per Year",
            HourlyLayout::Combined => "Combined",
        }
    }
}

/// Reduced hourly values, wide and long.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlyUsage {
    pub reducer: Reducer,
    /// One row per (year, hour), sorted.
    pub wide: Vec<UserTypeValues<(i32, u8)>>,
    /// `wide` melted on `user_type`.
    pub long: Vec<LongRow<(i32, u8)>>,
}

impl HourlyUsage {
    pub fn compute(rows: &[HourlyRecord], reducer: Reducer) -> Self {
        let mut groups: BTreeMap<(i32, u8), (Vec<f64>, Vec<f64>)> = BTreeMap::new();
        for row in rows {
            let (casual, registered) = groups.entry((row.year, row.hour)).or_default();
            casual.push(f64::from(row.casual));
            registered.push(f64::from(row.registered));
        }

        let wide: Vec<_> = groups
            .into_iter()
            .map(|(key, (casual, registered))| UserTypeValues {
                key,
                casual: reducer.apply(&casual),
                registered: reducer.apply(&registered),
            })
            .collect();
        let long = DataProcessor::stack_to_long(&wide);

        Self {
            reducer,
            wide,
            long,
        }
    }

    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.wide.iter().map(|row| row.key.0).collect();
        years.dedup();
        years
    }
}
