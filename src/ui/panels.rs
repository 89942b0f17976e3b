use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::class_counts;
use crate::data::loader::load_file;
use crate::data::model::Target;
use crate::inference::InferenceAdapter;
use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – page selection and dataset summary
// ---------------------------------------------------------------------------

/// Render the left side panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Wafer Dashboard");
    ui.separator();

    ui.strong("Select page");
    egui::ComboBox::from_id_salt("page_select")
        .selected_text(state.page.label())
        .show_ui(ui, |ui: &mut Ui| {
            for page in Page::ALL {
                ui.selectable_value(&mut state.page, page, page.label());
            }
        });
    ui.separator();

    match &state.dataset {
        Some(ds) => {
            let (normal, abnormal) = class_counts(ds);
            ui.label(format!("{} records, {} features", ds.len(), ds.feature_count()));
            ui.label(format!(
                "{normal} {} ({}) / {abnormal} {} ({})",
                Target::Normal,
                Target::Normal.code(),
                Target::Abnormal,
                Target::Abnormal.code()
            ));
        }
        None => {
            ui.label("No dataset loaded.");
        }
    }

    ui.add_space(4.0);
    if state.adapter.is_ready() {
        ui.label("Model ready");
    } else {
        ui.label(RichText::new("Model unavailable").color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_dataset_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load model…").clicked() {
                open_model_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("Semiconductor abnormality classification");

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_dataset_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open wafer dataset")
        .add_filter("Supported files", &["arff", "csv", "parquet", "pq"])
        .add_filter("ARFF", &["arff"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => state.set_load_error(&e),
        }
    }
}

pub fn open_model_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load classifier")
        .add_filter("Model JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.set_adapter(InferenceAdapter::load(&path));
    }
}
