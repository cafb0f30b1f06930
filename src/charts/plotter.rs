//! Chart Plotter Module
//! Draws chart specifications with egui_plot.

use super::spec::{ChartKind, ChartSpec, ColorScale, LineDash, Panel, Series};
use crate::stats::group_thousands;
use chrono::{Days, NaiveDate};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Points, Text};

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// Raw daily series in the trend chart.
pub const RAW_SERIES_COLOR: Color32 = Color32::from_rgb(200, 200, 200);
/// Rolling mean in the trend chart.
pub const ROLLING_COLOR: Color32 = Color32::from_rgb(214, 39, 40);

const HEAT_CELL_SIZE: [f32; 2] = [34.0, 20.0];

/// Draws dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw a chart with its title. Empty charts show a placeholder.
    pub fn draw(ui: &mut egui::Ui, id: &str, spec: &ChartSpec, height: f32) {
        ui.label(RichText::new(&spec.title).size(14.0).strong());
        ui.add_space(4.0);

        if spec.is_empty() {
            ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No data for the current filters").color(Color32::GRAY));
                });
            });
            return;
        }

        match &spec.kind {
            ChartKind::Bar { categories, values } => {
                Self::draw_bars(ui, id, spec, categories, values, height)
            }
            ChartKind::GroupedBar {
                categories,
                series,
                y_max,
            } => Self::draw_grouped_bars(ui, id, spec, categories, series, *y_max, height),
            ChartKind::Line { x_step, panels } => {
                Self::draw_lines(ui, id, spec, *x_step, panels, height)
            }
            ChartKind::TimeSeries { dates, series } => {
                Self::draw_time_series(ui, id, spec, dates, series, height)
            }
            ChartKind::Heatmap {
                rows,
                columns,
                values,
                scale,
            } => Self::draw_heatmap(ui, id, spec, rows, columns, values, *scale),
        }
    }

    /// Axis formatter that labels integer positions with category names.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let v = mark.value;
            if (v - v.round()).abs() > 1e-6 || v < 0.0 {
                return String::new();
            }
            labels.get(v.round() as usize).cloned().unwrap_or_default()
        }
    }

    fn draw_bars(
        ui: &mut egui::Ui,
        id: &str,
        spec: &ChartSpec,
        categories: &[String],
        values: &[f64],
        height: f32,
    ) {
        Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .allow_drag(false)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .x_axis_formatter(Self::category_formatter(categories.to_vec()))
            .include_y(0.0)
            .show(ui, |plot_ui| {
                for (i, (category, &value)) in categories.iter().zip(values).enumerate() {
                    let color = Self::series_color(i);
                    let bar = Bar::new(i as f64, value).width(0.6).name(category);
                    plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(category));
                    plot_ui.text(
                        Text::new(PlotPoint::new(i as f64, value), format!("{:.0}", value))
                            .anchor(egui::Align2::CENTER_BOTTOM),
                    );
                }
            });
    }

    fn draw_grouped_bars(
        ui: &mut egui::Ui,
        id: &str,
        spec: &ChartSpec,
        categories: &[String],
        series: &[Series],
        y_max: Option<f64>,
        height: f32,
    ) {
        let group_width = 0.8;
        let bar_width = group_width / series.len().max(1) as f64;

        let mut plot = Plot::new(id)
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .x_axis_formatter(Self::category_formatter(categories.to_vec()))
            .include_y(0.0);
        if let Some(y_max) = y_max {
            plot = plot.include_y(y_max);
        }

        plot.show(ui, |plot_ui| {
            for (s, serie) in series.iter().enumerate() {
                let offset = (s as f64 - (series.len() as f64 - 1.0) / 2.0) * bar_width;
                let bars: Vec<Bar> = serie
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Bar::new(i as f64 + offset, v).width(bar_width * 0.95))
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(Self::series_color(s))
                        .name(&serie.name),
                );
                for (i, &v) in serie.values.iter().enumerate() {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(i as f64 + offset, v),
                            group_thousands(v.max(0.0).round() as u64),
                        )
                        .anchor(egui::Align2::CENTER_BOTTOM),
                    );
                }
            }
        });
    }

    fn draw_lines(
        ui: &mut egui::Ui,
        id: &str,
        spec: &ChartSpec,
        x_step: f64,
        panels: &[Panel],
        height: f32,
    ) {
        let count = panels.len().max(1);
        ui.columns(count, |columns| {
            for (p, (panel, ui)) in panels.iter().zip(columns.iter_mut()).enumerate() {
                if let Some(title) = &panel.title {
                    ui.label(RichText::new(title).size(12.0).strong());
                }
                Self::draw_line_panel(ui, &format!("{id}_{p}"), spec, x_step, panel, height);
            }
        });
    }

    fn draw_line_panel(
        ui: &mut egui::Ui,
        id: &str,
        spec: &ChartSpec,
        x_step: f64,
        panel: &Panel,
        height: f32,
    ) {
        Plot::new(id)
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                let steps = v / x_step;
                if (steps - steps.round()).abs() < 1e-6 && v >= 0.0 {
                    format!("{:.0}", v)
                } else {
                    String::new()
                }
            })
            .include_y(0.0)
            .show(ui, |plot_ui| {
                for line in &panel.lines {
                    let color = Self::series_color(line.group);
                    let style = match line.dash {
                        LineDash::Solid => LineStyle::Solid,
                        LineDash::Dashed => LineStyle::dashed_loose(),
                    };
                    plot_ui.line(
                        Line::new(line.points.iter().copied().collect::<PlotPoints>())
                            .color(color)
                            .width(2.0)
                            .style(style)
                            .name(&line.name),
                    );
                    plot_ui.points(
                        Points::new(line.points.iter().copied().collect::<PlotPoints>())
                            .radius(2.5)
                            .color(color),
                    );
                }
            });
    }

    fn draw_time_series(
        ui: &mut egui::Ui,
        id: &str,
        spec: &ChartSpec,
        dates: &[NaiveDate],
        series: &[Series],
        height: f32,
    ) {
        let Some(&first) = dates.first() else {
            return;
        };

        Plot::new(id)
            .height(height)
            .legend(Legend::default())
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .x_axis_formatter(move |mark, _range| {
                if mark.value < 0.0 {
                    return String::new();
                }
                first
                    .checked_add_days(Days::new(mark.value.round() as u64))
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for (s, serie) in series.iter().enumerate() {
                    let (color, width) = if s == 0 {
                        (RAW_SERIES_COLOR, 1.0)
                    } else {
                        (ROLLING_COLOR, 3.0)
                    };
                    let points: PlotPoints = serie
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| [i as f64, v])
                        .collect();
                    plot_ui.line(Line::new(points).color(color).width(width).name(&serie.name));
                }
            });
    }

    fn draw_heatmap(
        ui: &mut egui::Ui,
        id: &str,
        spec: &ChartSpec,
        rows: &[String],
        columns: &[String],
        values: &[Vec<f64>],
        scale: ColorScale,
    ) {
        let max = values
            .iter()
            .flat_map(|row| row.iter().copied())
            .fold(0.0, f64::max);

        ui.label(
            RichText::new(format!("{} (rows) x {} (columns)", spec.y_label, spec.x_label))
                .size(11.0)
                .color(Color32::GRAY),
        );

        egui::ScrollArea::horizontal().id_salt(id).show(ui, |ui| {
            egui::Grid::new(ui.make_persistent_id(id))
                .spacing([2.0, 2.0])
                .show(ui, |ui| {
                    ui.label("");
                    for column in columns {
                        ui.label(RichText::new(column).size(10.0).strong());
                    }
                    ui.end_row();

                    for (row, row_values) in rows.iter().zip(values) {
                        ui.label(RichText::new(row).size(11.0).strong());
                        for &value in row_values {
                            let t = if max > 0.0 { value / max } else { 0.0 };
                            let fill = Self::heat_color(scale, t);
                            let text_color = if t > 0.55 {
                                Color32::WHITE
                            } else {
                                Color32::BLACK
                            };
                            egui::Frame::none()
                                .fill(fill)
                                .rounding(2.0)
                                .show(ui, |ui| {
                                    ui.set_min_size(egui::vec2(
                                        HEAT_CELL_SIZE[0],
                                        HEAT_CELL_SIZE[1],
                                    ));
                                    ui.centered_and_justified(|ui| {
                                        ui.label(
                                            RichText::new(format!("{:.0}", value))
                                                .size(10.0)
                                                .color(text_color),
                                        );
                                    });
                                });
                        }
                        ui.end_row();
                    }
                });
        });
    }

    /// Map `t` in [0, 1] onto a color scale.
    pub fn heat_color(scale: ColorScale, t: f64) -> Color32 {
        let stops: &[[u8; 3]] = match scale {
            ColorScale::YlOrRd => &[[255, 255, 204], [253, 141, 60], [189, 0, 38]],
            ColorScale::Blues => &[[247, 251, 255], [107, 174, 214], [8, 48, 107]],
        };

        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (stops.len() - 1) as f64;
        let lower = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - lower as f64;

        let channel = |i: usize| {
            let a = f64::from(stops[lower][i]);
            let b = f64::from(stops[lower + 1][i]);
            (a + (b - a) * frac).round() as u8
        };
        Color32::from_rgb(channel(0), channel(1), channel(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(
            ChartPlotter::heat_color(ColorScale::YlOrRd, 0.0),
            Color32::from_rgb(255, 255, 204)
        );
        assert_eq!(
            ChartPlotter::heat_color(ColorScale::YlOrRd, 1.0),
            Color32::from_rgb(189, 0, 38)
        );
        assert_eq!(
            ChartPlotter::heat_color(ColorScale::Blues, 0.5),
            Color32::from_rgb(107, 174, 214)
        );
    }

    #[test]
    fn test_heat_color_clamps() {
        assert_eq!(
            ChartPlotter::heat_color(ColorScale::Blues, -3.0),
            ChartPlotter::heat_color(ColorScale::Blues, 0.0)
        );
        assert_eq!(
            ChartPlotter::heat_color(ColorScale::Blues, f64::NAN),
            ChartPlotter::heat_color(ColorScale::Blues, 0.0)
        );
    }

    #[test]
    fn test_series_color_wraps() {
        assert_eq!(ChartPlotter::series_color(0), ChartPlotter::series_color(10));
    }
}
