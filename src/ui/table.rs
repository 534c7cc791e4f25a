use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Ui};

use crate::data::model::{MatrixView, ModelRow};
use crate::state::AppState;
use crate::ui::{help, panels};

const TITLE: &str = "EModelDB";
const SUBTITLE: &str = "Database of Empirical Substitution Models of Protein Evolution";

const HEADERS: [&str; 6] = [
    "Select",
    "Name",
    "Matrix Type",
    "Taxonomic Group",
    "Comments",
    "References",
];

/// Relative column widths, in header order.
const COLUMN_WEIGHTS: [f32; 6] = [2.0, 4.0, 4.0, 5.0, 5.0, 4.0];

const WARNING_COLOR: Color32 = Color32::from_rgb(0xd9, 0x8c, 0x00);

// ---------------------------------------------------------------------------
// Central panel – heading, help, result table and download controls
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.label(RichText::new(TITLE).size(30.0).strong());
    ui.label(RichText::new(SUBTITLE).size(20.0));
    ui.add_space(8.0);

    help::help_panel(ui, &mut state.show_help);

    if let Some(err) = &state.view_error {
        ui.label(RichText::new(format!("Error: {err}")).color(Color32::RED));
        return;
    }

    state.apply_select_all();

    let widths = column_widths(ui.available_width(), ui.spacing().item_spacing.x);
    header_row(ui, &widths);
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if state.rows.is_empty() {
                ui.label("No models match the current filters.");
            }

            // Rows are cloned so the selection map can be mutated while drawing.
            let rows = state.rows.clone();
            for row in &rows {
                model_row(ui, state, row, &widths);
                matrix_expander(ui, state, &row.name);
                ui.separator();
            }

            ui.add_space(8.0);
            if ui.checkbox(&mut state.select_all, "Select All").changed() {
                state.apply_select_all();
            }

            let selected = state.selected_models().len();
            if selected > 0 {
                let label = format!("Download Selected Matrices as ZIP ({selected})");
                if ui.button(label).clicked() {
                    panels::save_archive_dialog(state);
                }
            }
        });
}

/// Split `available` width across the six columns by [`COLUMN_WEIGHTS`].
fn column_widths(available: f32, spacing: f32) -> [f32; 6] {
    let usable = (available - spacing * (COLUMN_WEIGHTS.len() - 1) as f32).max(0.0);
    let total: f32 = COLUMN_WEIGHTS.iter().sum();
    COLUMN_WEIGHTS.map(|w| usable * w / total)
}

fn cell(ui: &mut Ui, width: f32, add_contents: impl FnOnce(&mut Ui)) {
    ui.allocate_ui_with_layout(
        egui::vec2(width, 0.0),
        Layout::top_down(Align::Min),
        |ui: &mut Ui| {
            ui.set_width(width);
            add_contents(ui);
        },
    );
}

fn header_row(ui: &mut Ui, widths: &[f32; 6]) {
    ui.horizontal_top(|ui: &mut Ui| {
        for (title, width) in HEADERS.iter().zip(widths) {
            cell(ui, *width, |ui: &mut Ui| {
                ui.label(RichText::new(*title).size(20.0).strong());
            });
        }
    });
}

fn model_row(ui: &mut Ui, state: &mut AppState, row: &ModelRow, widths: &[f32; 6]) {
    ui.horizontal_top(|ui: &mut Ui| {
        cell(ui, widths[0], |ui: &mut Ui| {
            let mut checked = state.is_selected(&row.name);
            if ui
                .checkbox(&mut checked, "")
                .on_hover_text("Select this model")
                .changed()
            {
                state.set_selected(&row.name, checked);
            }
        });
        cell(ui, widths[1], |ui: &mut Ui| {
            ui.label(row.name.as_str());
        });
        cell(ui, widths[2], |ui: &mut Ui| {
            ui.label(row.matrix_type.as_str());
        });
        cell(ui, widths[3], |ui: &mut Ui| {
            ui.label(row.taxonomic_group.as_str());
        });
        cell(ui, widths[4], |ui: &mut Ui| {
            ui.label(row.comments.as_str());
        });
        cell(ui, widths[5], |ui: &mut Ui| {
            if row.reference.url.is_empty() {
                ui.label(row.reference.label.as_str());
            } else {
                ui.hyperlink_to(row.reference.label.as_str(), &row.reference.url);
            }
        });
    });
}

/// Salted with the reset generation so a reset starts with every expander
/// collapsed again.
fn expander_id(generation: u64, name: &str) -> egui::Id {
    egui::Id::new(("matrix", generation, name))
}

/// Collapsible raw-text view of a model's matrix, fetched on first open.
fn matrix_expander(ui: &mut Ui, state: &mut AppState, name: &str) {
    let generation = state.generation;
    egui::CollapsingHeader::new(format!("View {name} matrix"))
        .id_salt(expander_id(generation, name))
        .default_open(false)
        .show(ui, |ui: &mut Ui| match state.matrix_view(name) {
            Ok(MatrixView::Text(text)) => {
                ScrollArea::horizontal()
                    .id_salt(("matrix_scroll", generation, name))
                    .show(ui, |ui: &mut Ui| {
                        ui.add(egui::Label::new(RichText::new(text.as_str()).monospace()).extend());
                    });
            }
            Ok(MatrixView::Missing) => {
                ui.label(
                    RichText::new(format!("⚠ No matrix file found for {name} model"))
                        .color(WARNING_COLOR),
                );
            }
            Err(e) => {
                ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
            }
        });
}
