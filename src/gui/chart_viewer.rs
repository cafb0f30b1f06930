//! Chart Viewer Widget
//! Central scrollable panel: KPI row, the five analysis sections with their
//! view toggles, insight notes and a preview of the filtered rows.

use crate::charts::{ChartPlotter, DashboardCharts};
use crate::data::{DailyRecord, HourlyRecord, Table};
use crate::stats::{
    ComparisonMode, DashboardViews, HourlyLayout, Reducer, RollingWindow, ViewOptions,
};
use egui::{Color32, ComboBox, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 320.0;
const HALF_CHART_HEIGHT: f32 = 280.0;

const SEASON_WEATHER_INSIGHTS: [&str; 3] = [
    "Average rentals peak in Fall, followed by Summer and Winter, while Spring stays low: demand is strongly seasonal.",
    "Demand is highest in clear weather, drops when cloudy and falls sharply in light rain.",
    "The season/weather grid shows warm seasons with clear skies drive the most rentals; rain suppresses demand in every season.",
];

const HOURLY_INSIGHTS: [&str; 3] = [
    "Registered users follow a commuting pattern with peaks around 8:00 and 17:00.",
    "Casual users peak between 12:00 and 16:00, pointing to leisure trips.",
    "Peak hours are consistent between 2011 and 2012, but 2012 runs at a higher level, showing demand growth.",
];

const ROLLING_INSIGHTS: [&str; 2] = [
    "The rolling average shows growth from 2011 to 2012, with 2012 demand sitting at a higher level.",
    "Rentals rise towards mid and late year and fall again around year end.",
];

const COMPARISON_INSIGHTS: [&str; 2] = [
    "Registered users dominate total rentals in both 2011 and 2012.",
    "Both user types grow in 2012, but most of the increase comes from registered users.",
];

const WEEKDAY_HOUR_INSIGHTS: [&str; 3] = [
    "Weekdays show two clear peaks, in the morning (about 7-9) and late afternoon (about 16-18), matching commuter traffic.",
    "On weekends activity concentrates from midday to afternoon with a flatter peak.",
    "These patterns can guide bike redistribution and capacity planning for busy hours.",
];

/// Scrollable dashboard body.
pub struct ChartViewer {
    preview_rows: usize,
}

impl ChartViewer {
    pub fn new(preview_rows: usize) -> Self {
        Self { preview_rows }
    }

    /// Draw every section. Returns true when a view toggle changed.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        views: &DashboardViews,
        charts: &DashboardCharts,
        options: &mut ViewOptions,
    ) -> bool {
        let before = *options;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new("🚲 Bike Sharing Dashboard (2011-2012)")
                        .size(24.0)
                        .strong(),
                );
                ui.label(
                    RichText::new("Interactive dashboard for exploring bike rental trends.")
                        .size(12.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(8.0);

                for notice in &views.notices {
                    Self::draw_notice(ui, notice.message());
                }

                Self::draw_kpis(ui, views);
                ui.add_space(SECTION_SPACING);
                ui.separator();

                Self::draw_season_weather(ui, charts);
                Self::draw_hourly(ui, charts, options);
                Self::draw_rolling(ui, charts, options);
                Self::draw_comparison(ui, views, charts, options);
                Self::draw_weekday_hour(ui, charts);

                self.draw_preview(ui, views);
            });

        *options != before
    }

    fn draw_notice(ui: &mut egui::Ui, message: &str) {
        egui::Frame::none()
            .fill(Color32::from_rgb(52, 73, 94))
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(format!("ℹ {}", message)).color(Color32::WHITE));
            });
        ui.add_space(5.0);
    }

    fn draw_kpis(ui: &mut egui::Ui, views: &DashboardViews) {
        let pairs = views.kpis.display_pairs();
        ui.columns(pairs.len(), |columns| {
            for (ui, (label, value)) in columns.iter_mut().zip(pairs) {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(8.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                        ui.label(RichText::new(value).size(22.0).strong());
                    });
            }
        });
    }

    fn section_header(ui: &mut egui::Ui, title: &str) {
        ui.add_space(SECTION_SPACING);
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(8.0);
    }

    fn draw_insights(ui: &mut egui::Ui, id: &str, lines: &[&str]) {
        egui::CollapsingHeader::new("💡 Insight")
            .id_salt(id)
            .show(ui, |ui| {
                for line in lines {
                    ui.label(format!("• {}", line));
                }
            });
        ui.add_space(SECTION_SPACING);
        ui.separator();
    }

    fn draw_season_weather(ui: &mut egui::Ui, charts: &DashboardCharts) {
        Self::section_header(ui, "⛅ Rentals by Season and Weather");

        ui.columns(2, |columns| {
            ChartPlotter::draw(&mut columns[0], "season_means", &charts.season, HALF_CHART_HEIGHT);
            match &charts.weather {
                Some(spec) => {
                    ChartPlotter::draw(&mut columns[1], "weather_means", spec, HALF_CHART_HEIGHT)
                }
                None => {
                    columns[1].label(
                        RichText::new("Weather chart is hidden: no weather column available.")
                            .color(Color32::GRAY),
                    );
                }
            }
        });

        if let Some(spec) = &charts.season_weather {
            ui.add_space(10.0);
            ChartPlotter::draw(ui, "season_weather", spec, HALF_CHART_HEIGHT);
        }
        ui.add_space(8.0);
        Self::draw_insights(ui, "season_weather_insight", &SEASON_WEATHER_INSIGHTS);
    }

    fn draw_hourly(ui: &mut egui::Ui, charts: &DashboardCharts, options: &mut ViewOptions) {
        Self::section_header(ui, "🕛 Peak Rental Hours by User Type");

        ui.horizontal(|ui| {
            ui.label("Aggregation:");
            for reducer in [Reducer::Mean, Reducer::Sum] {
                ui.radio_value(&mut options.reducer, reducer, reducer.label());
            }
        });
        ui.horizontal(|ui| {
            ui.label("View:");
            for layout in [HourlyLayout::PerYear, HourlyLayout::Combined] {
                ui.radio_value(&mut options.hourly_layout, layout, layout.label());
            }
        });
        ui.add_space(5.0);

        ChartPlotter::draw(ui, "hourly", &charts.hourly, CHART_HEIGHT);
        ui.add_space(8.0);
        Self::draw_insights(ui, "hourly_insight", &HOURLY_INSIGHTS);
    }

    fn draw_rolling(ui: &mut egui::Ui, charts: &DashboardCharts, options: &mut ViewOptions) {
        Self::section_header(ui, "📈 Daily Rental Trend (Rolling Average)");

        ui.horizontal(|ui| {
            ui.label("Rolling window (days):");
            for window in RollingWindow::ALL {
                ui.radio_value(&mut options.rolling_window, window, window.days().to_string());
            }
        });
        ui.add_space(5.0);

        ChartPlotter::draw(ui, "rolling", &charts.rolling, CHART_HEIGHT);
        ui.add_space(8.0);
        Self::draw_insights(ui, "rolling_insight", &ROLLING_INSIGHTS);
    }

    fn draw_comparison(
        ui: &mut egui::Ui,
        views: &DashboardViews,
        charts: &DashboardCharts,
        options: &mut ViewOptions,
    ) {
        Self::section_header(ui, "📊 Casual vs Registered Rentals");

        let mut by_month = matches!(options.comparison, ComparisonMode::ByMonth(_));
        ui.horizontal(|ui| {
            ui.label("Compare by:");
            ui.radio_value(&mut by_month, false, "Year");
            ui.radio_value(&mut by_month, true, "Month");
        });

        if by_month {
            let years = &views.comparison_years;
            match options.comparison.month_year(years) {
                Some(mut year) => {
                    if !years.is_empty() {
                        ui.horizontal(|ui| {
                            ui.label("Year:");
                            ComboBox::from_id_salt("comparison_year")
                                .selected_text(year.to_string())
                                .show_ui(ui, |ui| {
                                    for &y in years {
                                        ui.selectable_value(&mut year, y, y.to_string());
                                    }
                                });
                        });
                    }
                    options.comparison = ComparisonMode::ByMonth(year);
                }
                None => {
                    ui.label(RichText::new("No years in the current selection.").weak());
                }
            }
        } else {
            options.comparison = ComparisonMode::ByYear;
        }
        ui.add_space(5.0);

        ChartPlotter::draw(ui, "comparison", &charts.comparison, CHART_HEIGHT);
        ui.add_space(8.0);
        Self::draw_insights(ui, "comparison_insight", &COMPARISON_INSIGHTS);
    }

    fn draw_weekday_hour(ui: &mut egui::Ui, charts: &DashboardCharts) {
        Self::section_header(ui, "📅 Average Rentals by Hour and Weekday");
        ChartPlotter::draw(ui, "weekday_hour", &charts.weekday_hour, HALF_CHART_HEIGHT);
        ui.add_space(8.0);
        Self::draw_insights(ui, "weekday_hour_insight", &WEEKDAY_HOUR_INSIGHTS);
    }

    fn draw_preview(&self, ui: &mut egui::Ui, views: &DashboardViews) {
        Self::section_header(ui, "Filtered Data Preview");

        egui::CollapsingHeader::new("Show filtered data")
            .id_salt("filtered_preview")
            .show(ui, |ui| {
                ui.label(RichText::new("Daily table").strong());
                self.preview_table(
                    ui,
                    "daily_preview",
                    &views.filtered.daily,
                    &DAILY_HEADER,
                    daily_cells,
                );
                ui.add_space(10.0);
                ui.label(RichText::new("Hourly table").strong());
                self.preview_table(
                    ui,
                    "hourly_preview",
                    &views.filtered.hourly,
                    &HOURLY_HEADER,
                    hourly_cells,
                );
            });
    }

    fn preview_table<R>(
        &self,
        ui: &mut egui::Ui,
        id: &str,
        table: &Table<R>,
        header: &[&str],
        cells: fn(&R, bool) -> Vec<String>,
    ) {
        let has_weather = table.weather.is_some();
        let shown = table.len().min(self.preview_rows);
        ui.label(
            RichText::new(format!("Showing {} of {} rows", shown, table.len()))
                .size(11.0)
                .color(Color32::GRAY),
        );

        if table.is_empty() {
            return;
        }
        let header: Vec<&str> = header
            .iter()
            .copied()
            .filter(|name| has_weather || *name != "weather")
            .collect();

        ScrollArea::both()
            .id_salt(id)
            .max_height(220.0)
            .show(ui, |ui| {
                egui::Grid::new(id).striped(true).num_columns(header.len()).show(ui, |ui| {
                    for name in &header {
                        ui.label(RichText::new(*name).strong());
                    }
                    ui.end_row();

                    for row in table.rows.iter().take(shown) {
                        for cell in cells(row, has_weather) {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
            });
    }
}

const DAILY_HEADER: [&str; 8] = [
    "date", "year", "month", "season", "weather", "count", "casual", "registered",
];
const HOURLY_HEADER: [&str; 9] = [
    "date", "hour", "year", "weekday", "season", "weather", "count", "casual", "registered",
];

fn daily_cells(row: &DailyRecord, has_weather: bool) -> Vec<String> {
    let mut cells = vec![
        row.date.to_string(),
        row.year.to_string(),
        row.month.label().to_string(),
        row.season.label().to_string(),
    ];
    if has_weather {
        cells.push(row.weather.clone().unwrap_or_default());
    }
    cells.extend([
        row.count.to_string(),
        row.casual.to_string(),
        row.registered.to_string(),
    ]);
    cells
}

fn hourly_cells(row: &HourlyRecord, has_weather: bool) -> Vec<String> {
    let mut cells = vec![
        row.date.to_string(),
        row.hour.to_string(),
        row.year.to_string(),
        row.weekday.label().to_string(),
        row.season.label().to_string(),
    ];
    if has_weather {
        cells.push(row.weather.clone().unwrap_or_default());
    }
    cells.extend([
        row.count.to_string(),
        row.casual.to_string(),
        row.registered.to_string(),
    ]);
    cells
}
