//! Bike Sharing Dashboard - Interactive rental analytics
//!
//! Loads the cleaned daily and hourly bike-sharing tables and displays KPIs
//! and charts that follow the sidebar filters.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::Context;
use config::DashboardConfig;
use data::DataLoader;
use eframe::egui;
use gui::DashboardApp;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load().context("loading dashboard configuration")?;

    // The dashboard cannot render without data; load errors end startup.
    let mut loader = DataLoader::new();
    let dataset = loader
        .load(&config.sources())
        .inspect_err(|e| log::error!("{}", e))
        .context("loading bike-sharing data")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Bike Sharing Dashboard"),
        ..Default::default()
    };

    let view_options = config.view_options();
    let preview_rows = config.preview_rows;

    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(move |cc| {
            Ok(Box::new(DashboardApp::new(
                cc,
                dataset,
                view_options,
                preview_rows,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {}", e))
}
