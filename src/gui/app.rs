//! Bike Sharing Dashboard Main Application
//! Main window with the filter panel and the dashboard body.

use crate::charts::DashboardCharts;
use crate::data::Dataset;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::{DashboardViews, ViewOptions};
use egui::SidePanel;
use std::sync::Arc;

/// Main application window.
///
/// Views are recomputed only when the filter or a view toggle changes.
pub struct DashboardApp {
    dataset: Arc<Dataset>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    options: ViewOptions,
    views: DashboardViews,
    charts: DashboardCharts,
    dirty: bool,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset: Arc<Dataset>,
        options: ViewOptions,
        preview_rows: usize,
    ) -> Self {
        let control_panel = ControlPanel::new(&dataset);
        let views = DashboardViews::compute(&dataset, &control_panel.filter, &options);
        let charts = DashboardCharts::from_views(&views);

        Self {
            dataset,
            control_panel,
            chart_viewer: ChartViewer::new(preview_rows),
            options,
            views,
            charts,
            dirty: false,
        }
    }

    fn recompute(&mut self) {
        self.views =
            DashboardViews::compute(&self.dataset, &self.control_panel.filter, &self.options);
        self.charts = DashboardCharts::from_views(&self.views);
        self.dirty = false;
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Filters
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::FiltersChanged => self.dirty = true,
                        ControlPanelAction::Reset => {
                            self.control_panel.reset(&self.dataset);
                            self.dirty = true;
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            if self
                .chart_viewer
                .show(ui, &self.views, &self.charts, &mut self.options)
            {
                self.dirty = true;
            }
        });

        if self.dirty {
            log::debug!("Filters or view options changed, recomputing");
            self.recompute();
            ctx.request_repaint();
        }
    }
}
