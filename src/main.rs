mod api;
mod app;
mod color;
mod config;
mod data;
mod format;
mod state;
mod ui;
mod worker;

use app::PbmDashboardApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PBM Analytics Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(PbmDashboardApp::new(cc, config)))),
    )
}
