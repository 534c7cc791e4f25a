use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::{write_table_csv, ARCHIVE_FILE_NAME, TABLE_FILE_NAME};
use crate::data::model::SortField;
use crate::state::AppState;

const CONTACT_EMAIL: &str = "paula.iglesias.rivas@uvigo.es";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel and re-query if anything changed.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let mut reset = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            dropdown(
                ui,
                "Matrix Type",
                &state.options.matrix_types,
                &mut state.filters.matrix_type,
            );
            dropdown(
                ui,
                "Taxonomic Group",
                &state.options.taxonomic_groups,
                &mut state.filters.taxonomic_group,
            );

            text_filter(ui, "Model Name", &mut state.filters.name);
            text_filter(ui, "Author/s", &mut state.filters.author);
            text_filter(ui, "Publication Year", &mut state.filters.year);
            text_filter(ui, "Comments", &mut state.filters.comments);

            ui.strong("Sort by");
            egui::ComboBox::from_id_salt("sort_by")
                .selected_text(state.sort_by.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for field in SortField::ALL {
                        ui.selectable_value(&mut state.sort_by, field, field.as_str());
                    }
                });
            ui.add_space(8.0);

            if ui.button("Clear Filters").clicked() {
                reset = true;
            }

            ui.add_space(16.0);
            ui.heading("Contact Us");
            ui.label("If you have any issues, please contact us:");
            ui.hyperlink_to(CONTACT_EMAIL, format!("mailto:{CONTACT_EMAIL}"));
        });

    if reset {
        state.reset();
    } else {
        state.refresh_if_changed();
    }
}

/// The empty option means "no filter".
fn option_text(option: &str) -> &str {
    if option.is_empty() {
        "(any)"
    } else {
        option
    }
}

fn dropdown(ui: &mut Ui, label: &str, options: &[String], value: &mut String) {
    ui.strong(label);
    egui::ComboBox::from_id_salt(label)
        .width(ui.available_width())
        .selected_text(option_text(value))
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                ui.selectable_value(value, option.clone(), option_text(option));
            }
        });
    ui.add_space(4.0);
}

fn text_filter(ui: &mut Ui, label: &str, value: &mut String) {
    ui.strong(label);
    ui.text_edit_singleline(value);
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let has_rows = !state.rows.is_empty();
            if ui
                .add_enabled(has_rows, egui::Button::new("Export table as CSV…"))
                .clicked()
            {
                export_table_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let scope = if state.filters.is_empty() {
            ""
        } else {
            " (filtered)"
        };
        ui.label(format!(
            "{} models listed{scope}, {} selected",
            state.rows.len(),
            state.selected_models().len()
        ));

        ui.separator();

        if ui.selectable_label(state.show_help, "Help").clicked() {
            state.show_help = !state.show_help;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Save dialogs
// ---------------------------------------------------------------------------

/// Ask where to save the selected matrices and write the ZIP archive there.
pub fn save_archive_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save selected matrices")
        .set_file_name(ARCHIVE_FILE_NAME)
        .add_filter("ZIP archive", &["zip"])
        .save_file();

    if let Some(path) = file {
        match write_archive(state, &path) {
            Ok(count) => {
                log::info!("Saved {count} matrices to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to save archive: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn write_archive(state: &AppState, path: &Path) -> Result<usize> {
    let archive = state.build_archive().context("building matrix archive")?;
    std::fs::write(path, &archive.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(archive.written.len())
}

/// Ask where to save the listed rows and write them as CSV.
pub fn export_table_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export model table")
        .set_file_name(TABLE_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match write_table(state, &path) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", state.rows.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export table: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn write_table(state: &AppState, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_table_csv(&state.rows, BufWriter::new(file))
        .with_context(|| format!("writing {}", path.display()))
}
