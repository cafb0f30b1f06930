//! One recomputation pass: raw tables + filter state -> every dashboard view.

use super::comparison::{Comparison, ComparisonMode};
use super::heatmap::WeekdayHourGrid;
use super::hourly::{HourlyLayout, HourlyUsage, Reducer};
use super::kpi::Kpis;
use super::rolling::{RollingSeries, RollingWindow};
use super::seasonal::{CategoryMean, SeasonWeatherPivot, SeasonalStats};
use crate::data::{Dataset, FilterState, Season};

/// Runtime toggles that change how views are computed or drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub reducer: Reducer,
    pub hourly_layout: HourlyLayout,
    pub rolling_window: RollingWindow,
    pub comparison: ComparisonMode,
}

/// Degradations surfaced to the user instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// No weather column: weather filter and charts are off.
    WeatherUnavailable,
    /// The filters matched no daily rows.
    EmptySelection,
    /// Daily rows matched but the hourly table has none for this selection.
    NoHourlyRows,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::WeatherUnavailable => {
                "Weather column not found; weather filter and charts are disabled."
            }
            Notice::EmptySelection => "No rows match the current filters.",
            Notice::NoHourlyRows => "No hourly rows match the current filters.",
        }
    }
}

/// Every aggregation the dashboard draws, for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    pub filtered: Dataset,
    pub kpis: Kpis,
    pub season_means: Vec<CategoryMean<Season>>,
    pub weather_means: Option<Vec<CategoryMean<String>>>,
    pub season_weather: Option<SeasonWeatherPivot>,
    pub hourly: HourlyUsage,
    pub hourly_layout: HourlyLayout,
    pub rolling: RollingSeries,
    pub comparison: Comparison,
    pub comparison_years: Vec<i32>,
    pub weekday_hour: WeekdayHourGrid,
    pub notices: Vec<Notice>,
}

impl DashboardViews {
    /// Filter both tables and run every aggregation. Pure: same inputs, same output.
    pub fn compute(dataset: &Dataset, filter: &FilterState, options: &ViewOptions) -> Self {
        let filtered = filter.apply_dataset(dataset);
        log::debug!(
            "Recomputed views: {} daily rows, {} hourly rows",
            filtered.daily.len(),
            filtered.hourly.len()
        );

        let daily = &filtered.daily.rows;
        let hourly = &filtered.hourly.rows;

        let mut notices = Vec::new();
        if !dataset.weather_enabled() {
            notices.push(Notice::WeatherUnavailable);
        }
        if filtered.daily.is_empty() {
            notices.push(Notice::EmptySelection);
        } else if filtered.hourly.is_empty() {
            notices.push(Notice::NoHourlyRows);
        }

        Self {
            kpis: Kpis::compute(daily),
            season_means: SeasonalStats::season_means(daily),
            weather_means: SeasonalStats::weather_means(&filtered.daily),
            season_weather: SeasonalStats::season_weather_pivot(&filtered.daily),
            hourly: HourlyUsage::compute(hourly, options.reducer),
            hourly_layout: options.hourly_layout,
            rolling: RollingSeries::compute(daily, options.rolling_window.days()),
            comparison: Comparison::compute(daily, options.comparison),
            comparison_years: Comparison::available_years(daily),
            weekday_hour: WeekdayHourGrid::compute(hourly),
            notices,
            filtered,
        }
    }
}
