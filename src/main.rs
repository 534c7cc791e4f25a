mod app;
mod data;
mod settings;
mod state;
mod ui;

use app::EModelDbApp;
use clap::Parser;
use data::store::Catalog;
use eframe::egui;
use settings::{AppConfig, Cli};

fn main() -> eframe::Result {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli).unwrap_or_else(|e| {
        log::error!("Failed to load configuration, using defaults: {e:#}");
        AppConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let catalog = Catalog::new(config.db_path);

    eframe::run_native(
        "EModelDB – Empirical Substitution Models",
        options,
        Box::new(|cc| Ok(Box::new(EModelDbApp::new(cc, catalog)))),
    )
}
