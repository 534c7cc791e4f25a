use eframe::egui;

use crate::data::store::Catalog;
use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EModelDbApp {
    pub state: AppState,
}

impl EModelDbApp {
    pub fn new(cc: &eframe::CreationContext<'_>, catalog: Catalog) -> Self {
        configure_style(&cc.egui_ctx);
        log::info!("Opening catalog {}", catalog.path().display());
        Self {
            state: AppState::new(catalog),
        }
    }
}

/// Larger text than the egui defaults; the table is meant to be read at a distance.
fn configure_style(ctx: &egui::Context) {
    ctx.style_mut(|style| {
        for font in style.text_styles.values_mut() {
            font.size *= 1.2;
        }
    });
}

impl eframe::App for EModelDbApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: result table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::central_panel(ui, &mut self.state);
        });
    }
}
