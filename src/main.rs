mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use app::SalaryDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    // Optional first argument: path to a JSON config file.
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DashboardConfig::resolve(explicit.as_deref(), Path::new("."))?;

    let dataset = match data::loader::load_file(&config.data_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load {}: {e}", config.data_path.display());
            return Err(e)
                .with_context(|| format!("loading dataset {}", config.data_path.display()));
        }
    };
    if dataset.is_empty() {
        log::warn!("{} contains no records", config.data_path.display());
    } else {
        log::info!(
            "Loaded {} records from {}",
            dataset.len(),
            config.data_path.display()
        );
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    let state = AppState::new(dataset, config);

    eframe::run_native(
        "Salary Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SalaryDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {e}"))
}
