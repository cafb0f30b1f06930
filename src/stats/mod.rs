//! Stats module - KPIs and the aggregation views behind each chart

mod comparison;
mod heatmap;
mod hourly;
mod kpi;
mod rolling;
mod seasonal;
mod views;

pub use comparison::{Comparison, ComparisonMode, UserTypeComparison};
pub use heatmap::{WeekdayHourGrid, HOURS};
pub use hourly::{HourlyLayout, HourlyUsage, Reducer};
pub use kpi::{group_thousands, Kpis};
pub use rolling::{RollingSeries, RollingWindow};
pub use seasonal::{CategoryMean, SeasonWeatherPivot, SeasonalStats};
pub use views::{DashboardViews, Notice, ViewOptions};

use statrs::statistics::Statistics;

/// Arithmetic mean, 0.0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
        assert_eq!(mean(&[10.0, 20.0]), 15.0);
        assert_eq!(mean(&[7.0]), 7.0);
    }
}
