//! Chart Specification Module
//! Renderer-independent descriptions of every dashboard chart: categories,
//! series, axis labels and titles.

use crate::data::{DataProcessor, Season, UserType, Weekday};
use crate::stats::{
    CategoryMean, Comparison, DashboardViews, HourlyLayout, HourlyUsage, Reducer, RollingSeries,
    SeasonWeatherPivot, UserTypeComparison, WeekdayHourGrid, HOURS,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Headroom above the tallest bar in the year comparison chart.
pub const YEAR_BAR_HEADROOM: f64 = 1.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScale {
    /// Yellow -> orange -> red.
    YlOrRd,
    /// White -> blue.
    Blues,
}

/// One named series of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// One named line of (x, y) points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub dash: LineDash,
    /// Color group; lines of the same user type share one.
    pub group: usize,
}

/// A sub-plot of a line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: Option<String>,
    pub lines: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// One bar per category.
    Bar {
        categories: Vec<String>,
        values: Vec<f64>,
    },
    /// Bars grouped per category, one bar per series.
    GroupedBar {
        categories: Vec<String>,
        series: Vec<Series>,
        y_max: Option<f64>,
    },
    /// Line chart over a numeric x axis, one or more panels.
    Line { x_step: f64, panels: Vec<Panel> },
    /// Lines over a daily date axis.
    TimeSeries {
        dates: Vec<NaiveDate>,
        series: Vec<Series>,
    },
    /// Annotated grid of values.
    Heatmap {
        rows: Vec<String>,
        columns: Vec<String>,
        values: Vec<Vec<f64>>,
        scale: ColorScale,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
}

impl ChartSpec {
    fn new(title: impl Into<String>, x_label: &str, y_label: &str, kind: ChartKind) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            kind,
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.kind {
            ChartKind::Bar { categories, .. } => categories.is_empty(),
            ChartKind::GroupedBar { categories, .. } => categories.is_empty(),
            ChartKind::Line { panels, .. } => panels.iter().all(|p| p.lines.is_empty()),
            ChartKind::TimeSeries { dates, .. } => dates.is_empty(),
            ChartKind::Heatmap { rows, columns, .. } => rows.is_empty() || columns.is_empty(),
        }
    }

    fn category_bars<K>(
        title: &str,
        x_label: &str,
        means: &[CategoryMean<K>],
        label: impl Fn(&K) -> String,
    ) -> Self {
        Self::new(
            title,
            x_label,
            "Average Daily Rentals",
            ChartKind::Bar {
                categories: means.iter().map(|m| label(&m.category)).collect(),
                values: means.iter().map(|m| m.mean).collect(),
            },
        )
    }

    pub fn season_means(means: &[CategoryMean<Season>]) -> Self {
        Self::category_bars("Average Rentals per Season", "Season", means, |s| {
            s.label().to_string()
        })
    }

    pub fn weather_means(means: &[CategoryMean<String>]) -> Self {
        Self::category_bars("Average Rentals per Weather", "Weather", means, |w| w.clone())
    }

    pub fn season_weather(pivot: &SeasonWeatherPivot) -> Self {
        Self::new(
            "Season and weather vs. average rentals",
            "Weather",
            "Season",
            ChartKind::Heatmap {
                rows: pivot.seasons.iter().map(|s| s.label().to_string()).collect(),
                columns: pivot.weather.clone(),
                values: pivot.values.clone(),
                scale: ColorScale::YlOrRd,
            },
        )
    }

    /// Hourly lines per user type. `PerYear` gives one panel per year;
    /// `Combined` puts all years in one panel, dashing every year after the first.
    pub fn hourly(usage: &HourlyUsage, layout: HourlyLayout) -> Self {
        let years = usage.years();
        let line = |year: i32, user_type: UserType, name: String, dash: LineDash| LineSeries {
            name,
            points: DataProcessor::values_for(&usage.long, user_type)
                .into_iter()
                .filter(|((y, _), _)| *y == year)
                .map(|((_, hour), value)| [f64::from(hour), value])
                .collect(),
            dash,
            group: user_type as usize,
        };

        let (title, panels): (&str, Vec<Panel>) = match layout {
            HourlyLayout::PerYear => (
                "Hourly rentals by user type (per year)",
                years
                    .iter()
                    .map(|&year| Panel {
                        title: Some(year.to_string()),
                        lines: UserType::ALL
                            .iter()
                            .map(|&ut| line(year, ut, ut.label().to_string(), LineDash::Solid))
                            .collect(),
                    })
                    .collect(),
            ),
            HourlyLayout::Combined => (
                "Hourly rentals by user type (combined)",
                vec![Panel {
                    title: None,
                    lines: years
                        .iter()
                        .enumerate()
                        .flat_map(|(i, &year)| {
                            let dash = if i == 0 { LineDash::Solid } else { LineDash::Dashed };
                            UserType::ALL.iter().map(move |&ut| (year, ut, dash))
                        })
                        .map(|(year, ut, dash)| {
                            line(year, ut, format!("{}, {}", ut.label(), year), dash)
                        })
                        .collect(),
                }],
            ),
        };

        let y_label = match usage.reducer {
            Reducer::Mean => "Average Rentals",
            Reducer::Sum => "Total Rentals",
        };

        Self::new(title, "Hour (0-23)", y_label, ChartKind::Line { x_step: 2.0, panels })
    }

    pub fn rolling(series: &RollingSeries) -> Self {
        Self::new(
            format!("Daily Rentals vs Rolling Mean ({} Days)", series.window),
            "Date",
            "Daily Rentals (count)",
            ChartKind::TimeSeries {
                dates: series.dates.clone(),
                series: vec![
                    Series {
                        name: "Daily rentals (raw)".to_string(),
                        values: series.raw.clone(),
                    },
                    Series {
                        name: format!("Rolling mean {}D", series.window),
                        values: series.rolling.clone(),
                    },
                ],
            },
        )
    }

    fn user_type_bars<K>(
        title: String,
        x_label: &str,
        totals: &UserTypeComparison<K>,
        label: impl Fn(&K) -> String,
        y_max: Option<f64>,
    ) -> Self {
        Self::new(
            title,
            x_label,
            "Total Rentals",
            ChartKind::GroupedBar {
                categories: totals.wide.iter().map(|row| label(&row.key)).collect(),
                series: UserType::ALL
                    .iter()
                    .map(|&ut| Series {
                        name: ut.title().to_string(),
                        values: totals.wide.iter().map(|row| row.get(ut)).collect(),
                    })
                    .collect(),
                y_max,
            },
        )
    }

    pub fn comparison(comparison: &Comparison) -> Self {
        match comparison {
            Comparison::ByYear(totals) => Self::user_type_bars(
                "Total Rentals per Year: Casual vs Registered".to_string(),
                "Year",
                totals,
                |year| year.to_string(),
                (!totals.is_empty()).then(|| totals.max_value() * YEAR_BAR_HEADROOM),
            ),
            Comparison::ByMonth { year, totals } => Self::user_type_bars(
                format!("Total Rentals per Month ({}): Casual vs Registered", year),
                "Month",
                totals,
                |month| month.label().to_string(),
                None,
            ),
        }
    }

    pub fn weekday_hour(grid: &WeekdayHourGrid) -> Self {
        Self::new(
            "Average rentals by weekday and hour",
            "Hour",
            "Day",
            ChartKind::Heatmap {
                rows: Weekday::ALL.iter().map(|d| d.label().to_string()).collect(),
                columns: (0..HOURS).map(|h| h.to_string()).collect(),
                values: grid.values.iter().map(|row| row.to_vec()).collect(),
                scale: ColorScale::Blues,
            },
        )
    }
}

/// Every chart on the dashboard, built from one set of views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub season: ChartSpec,
    pub weather: Option<ChartSpec>,
    pub season_weather: Option<ChartSpec>,
    pub hourly: ChartSpec,
    pub rolling: ChartSpec,
    pub comparison: ChartSpec,
    pub weekday_hour: ChartSpec,
}

impl DashboardCharts {
    pub fn from_views(views: &DashboardViews) -> Self {
        Self {
            season: ChartSpec::season_means(&views.season_means),
            weather: views.weather_means.as_deref().map(ChartSpec::weather_means),
            season_weather: views.season_weather.as_ref().map(ChartSpec::season_weather),
            hourly: ChartSpec::hourly(&views.hourly, views.hourly_layout),
            rolling: ChartSpec::rolling(&views.rolling),
            comparison: ChartSpec::comparison(&views.comparison),
            weekday_hour: ChartSpec::weekday_hour(&views.weekday_hour),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DailyRecord, HourlyRecord, Month};
    use crate::stats::{ComparisonMode, SeasonalStats};

    fn daily(year: i32, month: Month, casual: u32, registered: u32) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(year, month as u32 + 1, 1).unwrap(),
            year,
            month,
            season: Season::Summer,
            weather: None,
            count: casual + registered,
            casual,
            registered,
        }
    }

    fn hourly(year: i32, hour: u8, casual: u32, registered: u32) -> HourlyRecord {
        HourlyRecord {
            date: NaiveDate::from_ymd_opt(year, 1, 3).unwrap(),
            hour,
            year,
            season: Season::Spring,
            weekday: Weekday::Monday,
            weather: None,
            count: casual + registered,
            casual,
            registered,
        }
    }

    #[test]
    fn test_season_bar_spec() {
        let means = SeasonalStats::season_means(&[daily(2011, Month::Jul, 10, 90)]);
        let spec = ChartSpec::season_means(&means);
        assert_eq!(spec.title, "Average Rentals per Season");
        assert_eq!(
            spec.kind,
            ChartKind::Bar {
                categories: vec!["Summer".to_string()],
                values: vec![100.0],
            }
        );
    }

    #[test]
    fn test_year_comparison_has_headroom() {
        let rows = [daily(2011, Month::Jan, 10, 100), daily(2012, Month::Jan, 20, 200)];
        let spec = ChartSpec::comparison(&Comparison::compute(&rows, ComparisonMode::ByYear));
        match spec.kind {
            ChartKind::GroupedBar { categories, series, y_max } => {
                assert_eq!(categories, vec!["2011", "2012"]);
                assert_eq!(series[0].name, "Casual");
                assert_eq!(series[1].values, vec![100.0, 200.0]);
                assert!((y_max.unwrap() - 230.0).abs() < 1e-9);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_month_comparison_title() {
        let rows = [daily(2012, Month::Feb, 1, 2)];
        let comparison = Comparison::compute(&rows, ComparisonMode::ByMonth(2012));
        let spec = ChartSpec::comparison(&comparison);
        assert_eq!(spec.title, "Total Rentals per Month (2012): Casual vs Registered");
        assert_eq!(spec.x_label, "Month");
    }

    #[test]
    fn test_hourly_layouts() {
        let rows = [hourly(2011, 8, 1, 2), hourly(2012, 8, 3, 4)];
        let usage = HourlyUsage::compute(&rows, Reducer::Mean);

        let per_year = ChartSpec::hourly(&usage, HourlyLayout::PerYear);
        match &per_year.kind {
            ChartKind::Line { panels, x_step } => {
                assert_eq!(*x_step, 2.0);
                assert_eq!(panels.len(), 2);
                assert_eq!(panels[1].title.as_deref(), Some("2012"));
                assert_eq!(panels[1].lines[0].points, vec![[8.0, 3.0]]);
            }
            other => panic!("unexpected kind: {other:?}"),
        }

        let combined = ChartSpec::hourly(&usage, HourlyLayout::Combined);
        match &combined.kind {
            ChartKind::Line { panels, .. } => {
                assert_eq!(panels.len(), 1);
                let dashes: Vec<_> = panels[0].lines.iter().map(|l| l.dash).collect();
                assert_eq!(
                    dashes,
                    vec![LineDash::Solid, LineDash::Solid, LineDash::Dashed, LineDash::Dashed]
                );
                assert_eq!(panels[0].lines[3].name, "registered, 2012");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_weekday_hour_spec_is_full_grid() {
        let spec = ChartSpec::weekday_hour(&WeekdayHourGrid::compute(&[]));
        match &spec.kind {
            ChartKind::Heatmap { rows, columns, values, .. } => {
                assert_eq!(rows.len(), 7);
                assert_eq!(columns.len(), 24);
                assert_eq!(values[6][3], 0.0);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_empty_specs() {
        let spec = ChartSpec::rolling(&RollingSeries::compute(&[], 30));
        assert!(spec.is_empty());
        assert_eq!(spec.title, "Daily Rentals vs Rolling Mean (30 Days)");
    }

    #[test]
    fn test_spec_serializes_with_type_tag() {
        let spec = ChartSpec::season_means(&[]);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"]["type"], "bar");
        assert_eq!(json["title"], "Average Rentals per Season");
    }

    #[test]
    fn test_dashboard_charts_without_weather() {
        use crate::data::{Dataset, FilterState, Table};
        use crate::stats::ViewOptions;

        let dataset = Dataset {
            daily: Table::new(vec![daily(2011, Month::Jul, 10, 90)], None),
            hourly: Table::new(vec![hourly(2011, 8, 1, 2)], None),
        };
        let views = DashboardViews::compute(
            &dataset,
            &FilterState::full_domain(&dataset),
            &ViewOptions::default(),
        );
        let charts = DashboardCharts::from_views(&views);
        assert!(charts.weather.is_none());
        assert!(charts.season_weather.is_none());
        assert!(!charts.season.is_empty());
        assert!(!charts.rolling.is_empty());
    }
}
