//! EDA Explorer - Automated Exploratory Data Analysis
//!
//! Loads a CSV or Excel file and reports statistics, missing values,
//! duplicates and charts for it.

mod charts;
mod config;
mod data;
mod gui;
mod pipeline;
mod stats;

use config::AppConfig;
use eframe::egui;
use gui::EdaApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = AppConfig::load();
    log::info!("Starting EDA Explorer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([1000.0, 600.0])
            .with_title("EDA Explorer")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "EDA Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(EdaApp::new(cc, config)))),
    )
}
