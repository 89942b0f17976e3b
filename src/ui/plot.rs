use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::analysis::class_means::ClassMeans;
use crate::color::{CellPalette, class_line_colors};
use crate::data::model::Target;
use crate::layout::{BOXES_PER_ROW, CellKind, GridCell, grid_rows};
use crate::state::AppState;

const CELL_RADIUS: f32 = 24.0;
const ROW_HEIGHT: f32 = 60.0;

// ---------------------------------------------------------------------------
// Visualization page (central panel)
// ---------------------------------------------------------------------------

/// Render the class-mean chart, the feature selector and the correlation grid.
pub fn visualization_page(ui: &mut Ui, state: &mut AppState) {
    let Some(analysis) = &state.analysis else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore it  (File → Open dataset…)");
        });
        return;
    };

    if analysis.correlations.is_empty() {
        ui.label("The dataset has no feature columns.");
        return;
    }

    let names = analysis.correlations.names().to_vec();
    let means = analysis.means.clone();
    let [pair_counts, pair_sums] = analysis.correlations.summary_rows();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            class_mean_plot(ui, &means);
            ui.add_space(16.0);

            let mut selection = state.selected_feature.clone().unwrap_or_default();
            egui::ComboBox::from_label("Select attributes")
                .selected_text(&selection)
                .height(300.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &names {
                        ui.selectable_value(&mut selection, name.clone(), name);
                    }
                });
            if state.selected_feature.as_deref() != Some(selection.as_str()) {
                state.select_feature(&selection);
            }

            ui.add_space(8.0);
            ui.strong("Feature correlation visualization");
            ui.label("Understand about correlation between different features");
            let cells = state.grid_cells();
            correlation_grid_plot(ui, &cells);

            egui::CollapsingHeader::new("See correlated variables in text").show(
                ui,
                |ui: &mut Ui| {
                    let related = state.correlated_features();
                    ui.label(format!("{selection} is correlated with:"));
                    if related.is_empty() {
                        ui.label("no other attribute");
                    }
                    for cell in &cells {
                        if let (CellKind::Correlated, Some(r)) = (cell.kind, cell.correlation) {
                            ui.label(format!("{}: {r:.4}", cell.feature));
                        }
                    }
                    for (label, value) in state.selected_summary() {
                        ui.label(format!("{label}: {value:.4}"));
                    }
                },
            );

            egui::CollapsingHeader::new("Pair summary for all attributes").show(
                ui,
                |ui: &mut Ui| pair_summary_grid(ui, &names, &pair_counts, &pair_sums),
            );
        });
}

fn pair_summary_grid(
    ui: &mut Ui,
    names: &[String],
    counts: &(&'static str, Vec<f64>),
    sums: &(&'static str, Vec<f64>),
) {
    egui::ScrollArea::horizontal()
        .id_salt("pair_summary_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("pair_summary")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for name in names {
                        ui.strong(name);
                    }
                    ui.end_row();

                    ui.strong(counts.0);
                    for n in &counts.1 {
                        ui.label(format!("{n:.0}"));
                    }
                    ui.end_row();

                    ui.strong(sums.0);
                    for s in &sums.1 {
                        ui.label(format!("{s:.4}"));
                    }
                    ui.end_row();
                });
        });
}

// ---------------------------------------------------------------------------
// Mean sensor value per class
// ---------------------------------------------------------------------------

fn class_mean_plot(ui: &mut Ui, means: &ClassMeans) {
    let (normal_color, abnormal_color) = class_line_colors();
    let axis_names = means.feature_names.clone();
    let hover_names = means.feature_names.clone();

    ui.strong("Mean sensor value for abnormal vs normal records");
    for class in [Target::Abnormal, Target::Normal] {
        if means.for_class(class).iter().all(Option::is_none) {
            ui.label(RichText::new(format!("No {class} records: mean undefined")).italics());
        }
    }

    Plot::new("class_means")
        .height(320.0)
        .legend(Legend::default())
        .x_axis_label("Attributes")
        .y_axis_label("Mean Value")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if idx < 0.0 || (mark.value - idx).abs() > 1e-6 {
                return String::new();
            }
            axis_names.get(idx as usize).cloned().unwrap_or_default()
        })
        .label_formatter(move |name, value| {
            let idx = value.x.round();
            match hover_names.get(idx.max(0.0) as usize) {
                Some(feature) if !name.is_empty() => {
                    format!("{name}\nMean of {feature} = {:.2}", value.y)
                }
                _ => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            for (label, class, color) in [
                ("Abnormal", Target::Abnormal, abnormal_color),
                ("Normal", Target::Normal, normal_color),
            ] {
                let points: PlotPoints = means
                    .for_class(class)
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|y| [i as f64, y]))
                    .collect();
                plot_ui.line(Line::new(points).name(label).color(color).width(1.5));
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation grid
// ---------------------------------------------------------------------------

fn correlation_grid_plot(ui: &mut Ui, cells: &[GridCell]) {
    let palette = CellPalette::default();
    let rows = grid_rows(cells.len(), BOXES_PER_ROW);
    let tooltips: Vec<([f64; 2], String)> = cells
        .iter()
        .map(|c| (c.position(), c.tooltip.clone()))
        .collect();

    egui::Frame::default()
        .fill(palette.background)
        .inner_margin(4.0)
        .show(ui, |ui: &mut Ui| {
            Plot::new("correlation_grid")
                .height(rows as f32 * ROW_HEIGHT + 20.0)
                .show_axes(false)
                .show_grid(false)
                .show_background(false)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .data_aspect(1.0)
                .include_x(-0.5)
                .include_x(BOXES_PER_ROW as f64 - 0.5)
                .include_y(0.5)
                .include_y(-(rows as f64) + 0.5)
                .label_formatter(move |_name, value| {
                    let at = [value.x.round(), value.y.round()];
                    tooltips
                        .iter()
                        .find(|(pos, _)| *pos == at)
                        .map(|(_, text)| text.clone())
                        .unwrap_or_default()
                })
                .show(ui, |plot_ui| {
                    for cell in cells {
                        let [x, y] = cell.position();
                        plot_ui.points(
                            Points::new(vec![[x, y]])
                                .shape(MarkerShape::Square)
                                .radius(CELL_RADIUS)
                                .color(palette.color_for(cell.kind))
                                .name(&cell.feature),
                        );
                        plot_ui.text(Text::new(
                            PlotPoint::new(x, y),
                            RichText::new(&cell.feature).color(Color32::BLACK).small(),
                        ));
                    }
                });
        });
}
