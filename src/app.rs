use eframe::egui;

use crate::state::{AppState, Page};
use crate::ui::{panels, plot, prediction};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// One dashboard window. Its `AppState` is the session: records live and
/// die with the window.
pub struct WaferDashApp {
    pub state: AppState,
}

impl WaferDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for WaferDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: page selection ----
        egui::SidePanel::left("page_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active page ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.page {
            Page::Visualization => plot::visualization_page(ui, &mut self.state),
            Page::Prediction => prediction::prediction_page(ui, &mut self.state),
        });
    }
}
