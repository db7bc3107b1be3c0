mod app;
mod color;
mod state;
mod ui;

use anyhow::Context;
use app::DisasterDashApp;
use disaster_dash::config::AppConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env()?;
    let store = config
        .load_store()
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Natural Disaster Data Visualization",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DisasterDashApp::new(store, config.initial_range)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
