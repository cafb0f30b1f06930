//! Control Panel Widget
//! Left side panel with the filter controls.

use crate::data::{Dataset, FilterState, Season};
use chrono::NaiveDate;
use egui::{Color32, RichText, ScrollArea};
use egui_extras::DatePickerButton;
use std::collections::BTreeSet;

/// Left side control panel: date range, years, seasons and weather.
pub struct ControlPanel {
    pub filter: FilterState,
    domain: Option<(NaiveDate, NaiveDate)>,
    years: Vec<i32>,
    seasons: Vec<Season>,
    weather: Vec<String>,
}

impl ControlPanel {
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            filter: FilterState::full_domain(dataset),
            domain: dataset.date_domain(),
            years: dataset.year_options(),
            seasons: dataset.season_options(),
            weather: dataset.weather_options(),
        }
    }

    /// Select everything again.
    pub fn reset(&mut self, dataset: &Dataset) {
        self.filter = FilterState::full_domain(dataset);
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let before = self.filter.clone();
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚲 Bike Sharing")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Dashboard").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Date Range =====
        ui.label(RichText::new("📅 Date Range").size(14.0).strong());
        ui.add_space(5.0);

        if self.domain.is_some() {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    egui::Grid::new("date_range").num_columns(2).show(ui, |ui| {
                        ui.label("Start:");
                        ui.push_id("start_date", |ui| {
                            ui.add(DatePickerButton::new(&mut self.filter.start));
                        });
                        ui.end_row();

                        ui.label("End:");
                        ui.push_id("end_date", |ui| {
                            ui.add(DatePickerButton::new(&mut self.filter.end));
                        });
                        ui.end_row();
                    });
                });

            if let Some((min, max)) = self.domain {
                self.filter.clamp_dates(min, max);
            }
            if self.filter.start > self.filter.end {
                ui.label(
                    RichText::new("Start date is after end date")
                        .size(11.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            }
        } else {
            ui.label(RichText::new("No dates loaded").color(Color32::GRAY));
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Years =====
        ui.label(RichText::new("📆 Years").size(14.0).strong());
        ui.add_space(5.0);
        ui.horizontal_wrapped(|ui| {
            for &year in &self.years {
                toggle(ui, &mut self.filter.years, year, &year.to_string());
            }
        });
        Self::select_buttons(ui, "years", &mut self.filter.years, &self.years);

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Seasons =====
        ui.label(RichText::new("🌤 Seasons").size(14.0).strong());
        ui.add_space(5.0);
        ui.horizontal_wrapped(|ui| {
            for &season in &self.seasons {
                toggle(ui, &mut self.filter.seasons, season, season.label());
            }
        });
        Self::select_buttons(ui, "seasons", &mut self.filter.seasons, &self.seasons);

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Weather =====
        ui.label(RichText::new("☔ Weather").size(14.0).strong());
        ui.add_space(5.0);
        match &mut self.filter.weather {
            Some(selected) => {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(5.0)
                    .inner_margin(5.0)
                    .show(ui, |ui| {
                        ScrollArea::vertical().max_height(120.0).show(ui, |ui| {
                            for label in &self.weather {
                                toggle(ui, selected, label.clone(), label);
                            }
                        });
                    });
                Self::select_buttons(ui, "weather", selected, &self.weather);
            }
            None => {
                ui.label(
                    RichText::new("Weather column not found; weather filter is disabled.")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("↺ Reset Filters").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Reset;
            }
        });

        if action == ControlPanelAction::None && self.filter != before {
            action = ControlPanelAction::FiltersChanged;
        }
        action
    }

    fn select_buttons<T: Ord + Clone>(
        ui: &mut egui::Ui,
        id: &str,
        selected: &mut BTreeSet<T>,
        options: &[T],
    ) {
        ui.push_id(id, |ui| {
            ui.horizontal(|ui| {
                if ui.small_button("Select All").clicked() {
                    selected.extend(options.iter().cloned());
                }
                if ui.small_button("Clear All").clicked() {
                    selected.clear();
                }
            });
        });
    }
}

/// Checkbox bound to set membership.
fn toggle<T: Ord>(ui: &mut egui::Ui, selected: &mut BTreeSet<T>, value: T, label: &str) {
    let mut checked = selected.contains(&value);
    if ui.checkbox(&mut checked, label).changed() {
        if checked {
            selected.insert(value);
        } else {
            selected.remove(&value);
        }
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    FiltersChanged,
    Reset,
}
