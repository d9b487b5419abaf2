//! Covid Slides - slide-driven COVID-19 deaths & vaccination charts
//!
//! Desktop viewer for the yearly COVID-19 dataset.

use anyhow::Context;
use covid_slides::config::{VizConfig, DEFAULT_CONFIG_FILE};
use covid_slides::gui::CovidSlidesApp;
use covid_slides::logging;
use eframe::egui;
use std::path::Path;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let config_path = Path::new(DEFAULT_CONFIG_FILE);
    let (config, config_err) = VizConfig::load_or_default(config_path);
    logging::init(&config.log_level).map_err(anyhow::Error::msg)?;
    match config_err {
        Some(err) => warn!(
            path = %config_path.display(),
            error = %err,
            "ignoring invalid config, using defaults"
        ),
        None if config_path.exists() => info!(path = %config_path.display(), "loaded config"),
        None => {}
    }

    let app = CovidSlidesApp::from_config(config.clone()).context("failed to set up slides")?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 600.0])
            .with_title("COVID-19 Slides"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "COVID-19 Slides",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}
