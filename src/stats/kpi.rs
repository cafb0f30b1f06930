//! Headline metrics over the filtered daily table.

use super::mean;
use crate::data::DailyRecord;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total_rentals: u64,
    pub daily_average: f64,
    pub total_casual: u64,
    pub total_registered: u64,
    /// `total_registered / total_rentals * 100`, 0 when there are no rentals.
    pub registered_share: f64,
}

impl Kpis {
    pub fn compute(rows: &[DailyRecord]) -> Self {
        let total_rentals: u64 = rows.iter().map(|r| u64::from(r.count)).sum();
        let total_casual: u64 = rows.iter().map(|r| u64::from(r.casual)).sum();
        let total_registered: u64 = rows.iter().map(|r| u64::from(r.registered)).sum();
        let counts: Vec<f64> = rows.iter().map(|r| f64::from(r.count)).collect();

        let registered_share = if total_rentals == 0 {
            0.0
        } else {
            total_registered as f64 / total_rentals as f64 * 100.0
        };

        Self {
            total_rentals,
            daily_average: mean(&counts),
            total_casual,
            total_registered,
            registered_share,
        }
    }

    /// Label/value pairs in display order.
    pub fn display_pairs(&self) -> [(&'static str, String); 5] {
        [
            ("Total Rentals", group_thousands(self.total_rentals)),
            (
                "Average Daily Rentals",
                group_thousands(self.daily_average.round() as u64),
            ),
            ("Casual Users", group_thousands(self.total_casual)),
            ("Registered Users", group_thousands(self.total_registered)),
            ("Registered Share", format!("{:.1}%", self.registered_share)),
        ]
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
