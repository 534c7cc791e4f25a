use eframe::egui::{self, RichText, Ui};

struct HelpSection {
    title: &'static str,
    paragraphs: &'static [&'static str],
}

const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "What is in the catalog",
        paragraphs: &[
            "Each row is an empirical amino-acid substitution model: a matrix describing how \
             likely one amino acid is to be replaced by another, estimated from real protein \
             alignments of a given taxonomic group.",
            "Rate matrices hold instantaneous relative substitution rates and are used for \
             likelihood-based phylogenetic inference. Score matrices hold substitution scores \
             and are used by sequence-alignment tools.",
            "Rate matrix files usually end with one or more lines of equilibrium frequencies, \
             the amino-acid frequencies that complete the model.",
        ],
    },
    HelpSection {
        title: "Filtering",
        paragraphs: &[
            "All filters combine: a model is listed only if it matches every filter you set. \
             Text filters ignore letter case and match anywhere in the field.",
            "Publication Year matches the beginning of the publication date, so \"199\" lists \
             every model published in the 1990s.",
            "Clear Filters resets every filter, the sort order and your selection.",
        ],
    },
    HelpSection {
        title: "Viewing and downloading matrices",
        paragraphs: &[
            "Open \"View <model> matrix\" under a row to see the stored matrix as text. A \
             warning is shown when no matrix file is available for that model.",
            "Tick the models you want, or use Select All, then press Download to save a ZIP \
             archive with one <model>_matrix.txt file per model. Models without a matrix file \
             are left out of the archive. Files are saved exactly as stored.",
        ],
    },
    HelpSection {
        title: "Citing",
        paragraphs: &[
            "The References column links to the article that introduced each model. Please cite \
             the original publication of every model you use.",
        ],
    },
];

/// Render the help panel while `open` is set; the close button clears it.
pub fn help_panel(ui: &mut Ui, open: &mut bool) {
    if !*open {
        return;
    }
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            ui.heading("Help");
            if ui.small_button("Close").clicked() {
                *open = false;
            }
        });
        for section in SECTIONS {
            ui.add_space(6.0);
            ui.label(RichText::new(section.title).strong());
            for paragraph in section.paragraphs {
                ui.label(*paragraph);
            }
        }
    });
    ui.add_space(8.0);
}
