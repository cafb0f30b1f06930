//! Charts module - Chart specifications and egui rendering

mod plotter;
mod spec;

pub use plotter::ChartPlotter;
pub use spec::{ChartSpec, DashboardCharts};
