use std::time::Instant;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::export::{self, EXPORT_FILE_NAME, PREDICTION_COLUMN};
use crate::inference::{INPUT_DEFAULT, INPUT_FEATURES, INPUT_MAX, INPUT_MIN};
use crate::session::SessionRecordList;
use crate::state::AppState;

const SUCCESS_GREEN: Color32 = Color32::from_rgb(0x2e, 0x7d, 0x32);

// ---------------------------------------------------------------------------
// Prediction page (central panel)
// ---------------------------------------------------------------------------

/// Render sliders, the predict button, and the session records table.
pub fn prediction_page(ui: &mut Ui, state: &mut AppState) {
    let now = Instant::now();

    ui.heading("Make your predictions here");
    if let Some(err) = state.adapter.load_error() {
        ui.label(RichText::new(format!("Error loading the model: {err}")).color(Color32::RED));
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for name in INPUT_FEATURES {
                let mut value = state.input.get(name).unwrap_or(INPUT_DEFAULT);
                let slider = egui::Slider::new(&mut value, INPUT_MIN..=INPUT_MAX)
                    .text(slider_label(name));
                if ui.add(slider).changed() {
                    state.input.set(name, value);
                }
            }

            ui.add_space(8.0);
            let can_predict = state.adapter.is_ready() && state.pending.is_none();
            if ui.add_enabled(can_predict, egui::Button::new("Predict")).clicked() {
                // failures are kept in `prediction_error`
                state.submit_prediction(now).ok();
            }

            if let Some(pending) = state.pending {
                if state.poll_pending(now).is_none() {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.spinner();
                        ui.label("Sending input features to model...");
                    });
                    ui.ctx()
                        .request_repaint_after(pending.ready_at.saturating_duration_since(now));
                }
            }
            if let Some(result) = state.last_result {
                ui.label(
                    RichText::new(format!("Record added. Predicted output is: {result}"))
                        .color(SUCCESS_GREEN),
                );
            }
            if let Some(err) = &state.prediction_error {
                ui.label(RichText::new(err).color(Color32::RED));
            }

            ui.add_space(16.0);
            records_section(ui, state);
        });
}

/// `att1` → `Att1`
fn slider_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Session records
// ---------------------------------------------------------------------------

fn records_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Selected Records");
    if state.records.is_empty() {
        ui.label("No records added yet.");
        return;
    }

    ScrollArea::horizontal()
        .id_salt("records_scroll")
        .show(ui, |ui: &mut Ui| records_table(ui, &state.records));

    ui.horizontal(|ui: &mut Ui| {
        let count = state.records.len();
        egui::ComboBox::from_label("Delete record no.")
            .selected_text(state.delete_position.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for position in 1..=count {
                    ui.selectable_value(&mut state.delete_position, position, position.to_string());
                }
            });
        if let Some(record) = state.records.get(state.delete_position) {
            ui.label(format!("({})", record.prediction));
        }
        if ui.button("Delete").clicked() {
            state.delete_selected();
        }
        if ui.button("Reset Table").clicked() {
            state.reset_records();
        }
    });

    if state.records.is_empty() {
        return;
    }
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Download CSV").clicked() {
            save_csv_dialog(state);
        }
        if ui.button("Copy download link").clicked() {
            match export::to_csv(&state.records) {
                Ok(csv) => ui.ctx().copy_text(export::data_url(&csv)),
                Err(e) => {
                    log::error!("CSV export failed: {e:#}");
                    state.status_message = Some(format!("Error: {e:#}"));
                }
            }
        }
    });
}

fn records_table(ui: &mut Ui, records: &SessionRecordList) {
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(240.0)
        .column(Column::auto())
        .columns(Column::auto().at_least(48.0), INPUT_FEATURES.len())
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for name in INPUT_FEATURES {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
            header.col(|ui| {
                ui.strong(PREDICTION_COLUMN);
            });
        })
        .body(|mut body| {
            for (position, record) in records.iter() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(position.to_string());
                    });
                    for value in record.input.values() {
                        row.col(|ui| {
                            ui.label(format!("{value:.2}"));
                        });
                    }
                    row.col(|ui| {
                        ui.label(record.prediction.as_str());
                    });
                });
            }
        });
}

fn save_csv_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export selected records")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    if let Err(e) = export::write_csv(&state.records, &path) {
        log::error!("CSV export failed: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
