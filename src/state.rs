use std::collections::BTreeMap;

use crate::data::error::CatalogResult;
use crate::data::export::{build_matrix_archive, MatrixArchive};
use crate::data::model::{FilterOptions, Filters, MatrixView, ModelRow, SortField};
use crate::data::store::Catalog;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one interactive session owns, independent of rendering.
pub struct AppState {
    pub catalog: Catalog,

    /// Current filter inputs.
    pub filters: Filters,

    pub sort_by: SortField,

    /// Dropdown choices for taxonomic group and matrix type.
    pub options: FilterOptions,

    /// Rows returned by the last successful query.
    pub rows: Vec<ModelRow>,

    /// Per-model selection, keyed by model name. Absent means unselected.
    pub selection: BTreeMap<String, bool>,

    /// "Select all" toggle. Turning it off leaves selections as they are.
    pub select_all: bool,

    pub show_help: bool,

    /// Matrix views fetched so far (expanders are redrawn every frame).
    matrix_views: BTreeMap<String, Result<MatrixView, String>>,

    /// Error that blocks the whole table (failed query, missing database).
    pub view_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// Filters and sort of the rows currently in `rows`.
    applied: Option<(Filters, SortField)>,

    /// Bumped on every reset; widget ids derived from it forget their
    /// open/closed state.
    pub generation: u64,
}

impl AppState {
    /// Start a fresh session on `catalog`: load dropdown options and run the
    /// unfiltered query.
    pub fn new(catalog: Catalog) -> Self {
        let mut state = Self {
            catalog,
            filters: Filters::default(),
            sort_by: SortField::default(),
            options: FilterOptions::default(),
            rows: Vec::new(),
            selection: BTreeMap::new(),
            select_all: false,
            show_help: false,
            matrix_views: BTreeMap::new(),
            view_error: None,
            status_message: None,
            applied: None,
            generation: 0,
        };
        state.reload_options();
        state.refresh();
        state
    }

    /// Reload the taxonomic group / matrix type dropdown choices.
    pub fn reload_options(&mut self) {
        match self.catalog.filter_options() {
            Ok(options) => self.options = options,
            Err(e) => {
                log::error!("Failed to load filter options: {e}");
                self.options = FilterOptions::default();
            }
        }
    }

    /// Re-run the query if the filters or sort field changed since the last run.
    pub fn refresh_if_changed(&mut self) {
        let current = (self.filters.clone(), self.sort_by);
        if self.applied.as_ref() != Some(&current) {
            self.refresh();
        }
    }

    /// Run the query for the current filters. On failure no rows are listed.
    pub fn refresh(&mut self) {
        match self.catalog.query_models(&self.filters, self.sort_by.as_str()) {
            Ok(rows) => {
                self.rows = rows;
                self.view_error = None;
            }
            Err(e) => {
                log::error!("Model query failed: {e}");
                self.rows.clear();
                self.view_error = Some(e.to_string());
            }
        }
        self.applied = Some((self.filters.clone(), self.sort_by));
    }

    /// Clear filters, selections and cached views, then reload everything.
    pub fn reset(&mut self) {
        log::info!("Resetting filters and selection");
        let generation = self.generation + 1;
        *self = AppState::new(self.catalog.clone());
        self.generation = generation;
    }

    pub fn is_selected(&self, model: &str) -> bool {
        self.selection.get(model).copied().unwrap_or(false)
    }

    pub fn set_selected(&mut self, model: &str, selected: bool) {
        self.selection.insert(model.to_string(), selected);
    }

    /// If "select all" is on, mark every listed row as selected.
    pub fn apply_select_all(&mut self) {
        if !self.select_all {
            return;
        }
        for row in &self.rows {
            self.selection.insert(row.name.clone(), true);
        }
    }

    /// Listed models whose selection is on, in table order.
    pub fn selected_models(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| self.is_selected(&row.name))
            .map(|row| row.name.clone())
            .collect()
    }

    /// Matrix content for the expander of `model`, fetched once per session.
    pub fn matrix_view(&mut self, model: &str) -> &Result<MatrixView, String> {
        let catalog = &self.catalog;
        self.matrix_views
            .entry(model.to_string())
            .or_insert_with(|| catalog.matrix_view(model).map_err(|e| e.to_string()))
    }

    /// ZIP archive of the selected models' matrices.
    pub fn build_archive(&self) -> CatalogResult<MatrixArchive> {
        build_matrix_archive(&self.catalog, &self.selected_models())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_catalog;

    fn listed(state: &AppState) -> Vec<&str> {
        state.rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn new_session_lists_everything_unselected() {
        let (_dir, catalog) = sample_catalog();
        let state = AppState::new(catalog);
        assert_eq!(state.rows.len(), 7);
        assert!(state.selected_models().is_empty());
        assert_eq!(state.options.matrix_types[0], "");
        assert!(state.view_error.is_none());
    }

    #[test]
    fn filter_change_triggers_requery() {
        let (_dir, catalog) = sample_catalog();
        let mut state = AppState::new(catalog);
        state.filters.taxonomic_group = "insects".into();
        state.refresh_if_changed();
        assert_eq!(listed(&state), vec!["InsectsMt", "mtInv"]);

        state.sort_by = SortField::PublicationDate;
        state.filters.taxonomic_group.clear();
        state.refresh_if_changed();
        assert_eq!(listed(&state)[0], "JTT");
    }

    #[test]
    fn select_all_overrides_individual_choices() {
        let (_dir, catalog) = sample_catalog();
        let mut state = AppState::new(catalog);
        state.set_selected("LG", false);
        state.set_selected("WAG", true);

        state.select_all = true;
        state.apply_select_all();
        assert_eq!(state.selected_models().len(), 7);

        // Switching it off does not clear what it selected.
        state.select_all = false;
        state.apply_select_all();
        assert_eq!(state.selected_models().len(), 7);
    }

    #[test]
    fn selection_survives_requery_but_only_listed_rows_export() {
        let (_dir, catalog) = sample_catalog();
        let mut state = AppState::new(catalog);
        state.set_selected("JTT", true);
        state.set_selected("mtInv", true);

        state.filters.name = "mt".into();
        state.refresh_if_changed();
        assert_eq!(state.selected_models(), vec!["mtInv"]);

        state.filters.name.clear();
        state.refresh_if_changed();
        assert_eq!(state.selected_models(), vec!["JTT", "mtInv"]);
    }

    #[test]
    fn archive_contains_only_models_with_matrices() {
        let (_dir, catalog) = sample_catalog();
        let mut state = AppState::new(catalog);
        state.set_selected("JTT", true);
        state.set_selected("mtInv", true);
        let archive = state.build_archive().unwrap();
        assert_eq!(archive.written, vec!["JTT"]);
        assert_eq!(archive.skipped, vec!["mtInv"]);
    }

    #[test]
    fn matrix_views_are_cached_and_flag_missing() {
        let (_dir, catalog) = sample_catalog();
        let mut state = AppState::new(catalog);
        assert_eq!(state.matrix_view("mtInv"), &Ok(MatrixView::Missing));
        assert!(matches!(state.matrix_view("LG"), Ok(MatrixView::Text(_))));
        assert_eq!(state.matrix_views.len(), 2);
    }

    #[test]
    fn reset_restores_defaults() {
        let (_dir, catalog) = sample_catalog();
        let mut state = AppState::new(catalog);
        state.filters.year = "2001".into();
        state.sort_by = SortField::Author;
        state.select_all = true;
        state.apply_select_all();
        state.refresh_if_changed();
        let _ = state.matrix_view("WAG");
        assert_eq!(state.generation, 0);

        state.reset();
        assert_eq!(state.generation, 1);
        assert_eq!(state.filters, Filters::default());
        assert_eq!(state.sort_by, SortField::Name);
        assert!(!state.select_all);
        assert!(state.selection.is_empty());
        assert!(state.matrix_views.is_empty());
        assert_eq!(state.rows.len(), 7);

        state.reset();
        assert_eq!(state.generation, 2);
    }

    #[test]
    fn unavailable_storage_blocks_the_view() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Catalog::new(dir.path().join("absent.db")));
        assert!(state.rows.is_empty());
        let message = state.view_error.as_deref().unwrap();
        assert!(message.contains("unavailable"), "{message}");
    }
}
