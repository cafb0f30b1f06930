//! Casual vs registered totals, by year or by month of one year.

use crate::data::{DailyRecord, DataProcessor, LongRow, Month, UserTypeValues};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ComparisonMode {
    #[default]
    ByYear,
    ByMonth(i32),
}

impl ComparisonMode {
    /// Year for the month view given the offered years: the current one if
    /// still offered, else the first. An empty offer keeps a chosen year and
    /// yields `None` when none was chosen.
    pub fn month_year(self, years: &[i32]) -> Option<i32> {
        match self {
            ComparisonMode::ByMonth(year) if years.is_empty() || years.contains(&year) => {
                Some(year)
            }
            _ => years.first().copied(),
        }
    }
}

/// Summed user-type totals keyed by year or by month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserTypeComparison<K> {
    pub wide: Vec<UserTypeValues<K>>,
    pub long: Vec<LongRow<K>>,
}

impl<K: Clone> UserTypeComparison<K> {
    fn from_wide(wide: Vec<UserTypeValues<K>>) -> Self {
        let long = DataProcessor::stack_to_long(&wide);
        Self { wide, long }
    }

    pub fn max_value(&self) -> f64 {
        self.long.iter().map(|row| row.value).fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.wide.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Comparison {
    ByYear(UserTypeComparison<i32>),
    ByMonth {
        year: i32,
        totals: UserTypeComparison<Month>,
    },
}

impl Default for Comparison {
    fn default() -> Self {
        Comparison::ByYear(UserTypeComparison::default())
    }
}

impl Comparison {
    pub fn compute(rows: &[DailyRecord], mode: ComparisonMode) -> Self {
        match mode {
            ComparisonMode::ByYear => Comparison::ByYear(Self::by_year(rows)),
            ComparisonMode::ByMonth(year) => Comparison::ByMonth {
                year,
                totals: Self::by_month(rows, year),
            },
        }
    }

    fn sum_by<K: Ord + Clone>(rows: impl Iterator<Item = (K, u32, u32)>) -> Vec<UserTypeValues<K>> {
        let mut totals: BTreeMap<K, (u64, u64)> = BTreeMap::new();
        for (key, casual, registered) in rows {
            let entry = totals.entry(key).or_default();
            entry.0 += u64::from(casual);
            entry.1 += u64::from(registered);
        }
        totals
            .into_iter()
            .map(|(key, (casual, registered))| UserTypeValues {
                key,
                casual: casual as f64,
                registered: registered as f64,
            })
            .collect()
    }

    /// Totals per year, ascending.
    pub fn by_year(rows: &[DailyRecord]) -> UserTypeComparison<i32> {
        UserTypeComparison::from_wide(Self::sum_by(
            rows.iter().map(|r| (r.year, r.casual, r.registered)),
        ))
    }

    /// Totals per month of `year`, Jan..Dec. Months without rows are omitted.
    pub fn by_month(rows: &[DailyRecord], year: i32) -> UserTypeComparison<Month> {
        UserTypeComparison::from_wide(Self::sum_by(
            rows.iter()
                .filter(|r| r.year == year)
                .map(|r| (r.month, r.casual, r.registered)),
        ))
    }

    /// Years offered by the month view's year selector.
    pub fn available_years(rows: &[DailyRecord]) -> Vec<i32> {
        let years: BTreeSet<i32> = rows.iter().map(|r| r.year).collect();
        years.into_iter().collect()
    }
}
