use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;

use netflix_eda::app::NetflixEdaApp;
use netflix_eda::config::DashboardConfig;
use netflix_eda::data::loader::load_file;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = DashboardConfig::parse();

    let dataset = load_file(&config.data.path)
        .inspect_err(|e| log::error!("Failed to load {}: {e}", config.data.path.display()))
        .with_context(|| format!("Failed to load {}", config.data.path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Netflix Catalog Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(NetflixEdaApp::new(dataset)))),
    )
    .map_err(|e| anyhow!("eframe error: {e}"))
}
