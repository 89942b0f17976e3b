mod analysis;
mod app;
mod color;
mod config;
mod data;
mod error;
mod export;
mod inference;
mod layout;
mod session;
mod state;
mod ui;

use app::WaferDashApp;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    log::info!(
        "Starting with dataset {} and model {}",
        config.dataset_path.display(),
        config.model_path.display()
    );
    let state = AppState::from_config(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wafer Dashboard – Semiconductor abnormality classification",
        options,
        Box::new(move |_cc| Ok(Box::new(WaferDashApp::new(state)))),
    )
}
