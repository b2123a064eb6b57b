//! The sheet editor: one document shown through one grid view

use crate::columns::{ColumnError, ColumnModel, ColumnType};
use crate::config::SheetConfig;
use crate::csv::{
    demote_header, header_row, parse, promote_header, serialize_with_header, CellPosition,
    CellValue, Delimiter, ParseWarning, SeparatorState,
};
use crate::grid::{EventMask, GridEvent, GridOptions, GridView, ListenerId, Listeners, Selection};
use crate::layout::{freeze_count, ColumnTypeBar, FitMode, LayoutEngine};
use crate::search::{SearchError, SearchMatch, SearchOptions, SearchProvider};

use super::document::DocumentContext;

/// Owns the document, the grid view and all per-session sheet state.
///
/// Every operation that can mutate the view drains the view's event queue
/// before returning, so the document text and the search matches are in sync
/// with the grid whenever control is back with the caller.
pub struct SheetEditor<V: GridView, D: DocumentContext> {
    document: D,
    view: Option<V>,
    /// Options new views are created from (data and columns filled in per view)
    template: GridOptions,
    separators: SeparatorState,
    columns: ColumnModel,
    header_mode: bool,
    header_on_load: bool,
    layout: LayoutEngine,
    type_bar: ColumnTypeBar,
    search: SearchProvider,
    listeners: Listeners,
    persist_listener: Option<ListenerId>,
    warnings: Vec<ParseWarning>,
}

impl<V: GridView, D: DocumentContext> SheetEditor<V, D> {
    pub fn new(document: D, config: &SheetConfig) -> Self {
        let template = GridOptions {
            default_column_width: config.default_column_width,
            metrics: config.grid_metrics(),
            viewport_size: (config.viewport_width, config.viewport_height),
            ..GridOptions::default()
        };

        Self {
            document,
            view: None,
            template,
            separators: SeparatorState::default(),
            columns: ColumnModel::default(),
            header_mode: false,
            header_on_load: config.header_row,
            layout: config.layout_engine(),
            type_bar: ColumnTypeBar::new(),
            search: config.search_provider(),
            listeners: Listeners::new(),
            persist_listener: None,
            warnings: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Hand the document back, e.g. to save it
    pub fn into_document(self) -> D {
        self.document
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    /// Direct access to the view.
    ///
    /// Call [`pump_events`](Self::pump_events) after mutating through it.
    pub fn view_mut(&mut self) -> Option<&mut V> {
        self.view.as_mut()
    }

    pub fn is_ready(&self) -> bool {
        self.view.is_some()
    }

    pub fn separators(&self) -> &SeparatorState {
        &self.separators
    }

    pub fn columns(&self) -> &ColumnModel {
        &self.columns
    }

    pub fn header_mode(&self) -> bool {
        self.header_mode
    }

    pub fn fit_mode(&self) -> FitMode {
        self.layout.mode()
    }

    pub fn type_bar(&self) -> &ColumnTypeBar {
        &self.type_bar
    }

    pub fn search(&self) -> &SearchProvider {
        &self.search
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Warnings from the last parse
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// `(rows, columns)` covered by the selection
    pub fn selection_span(&self) -> Option<(usize, usize)> {
        self.view
            .as_ref()?
            .selection()
            .map(|s| (s.rows(), s.columns()))
    }

    // === Lifecycle ===

    /// Build the grid from the document once the host has loaded it.
    ///
    /// Returns false if the document is not ready or the editor was
    /// already initialized.
    pub fn on_ready(&mut self) -> bool {
        if !self.document.is_ready() {
            tracing::debug!("document not ready, grid not created");
            return false;
        }
        if self.view.is_some() {
            tracing::debug!("sheet already initialized");
            return false;
        }

        let pinned = self
            .document
            .path()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .and_then(Delimiter::from_extension);

        let text = self.document.text();
        let parsed = parse(&text, pinned);
        self.separators = parsed.separators;
        self.warnings = parsed.warnings;

        let data = parsed.grid;
        self.columns = ColumnModel::new(data.column_count());
        let mut options = self.template.clone();
        options.columns = self.columns.columns(data.column_count());
        options.data = data;

        let mut view = V::create(options);
        self.layout
            .choose_initial_mode(view.row_count(), view.column_count());
        self.layout.relayout(&mut view);
        self.type_bar.remeasure(&view);
        self.view = Some(view);

        self.persist_listener = Some(self.listeners.subscribe(EventMask::CONTENT));
        tracing::debug!(
            delimiter = ?self.separators.delimiter,
            mode = self.layout.mode().name(),
            "sheet ready"
        );

        if self.header_on_load {
            self.toggle_header();
        }
        true
    }

    /// Pick up an external change to the document text.
    ///
    /// Re-parses only when the text differs from what the grid serializes
    /// to. Returns whether the grid was reloaded.
    pub fn on_content_changed(&mut self) -> bool {
        let Some(current) = self.serialize() else {
            tracing::debug!("content change before ready ignored");
            return false;
        };
        let text = self.document.text();
        if text == current {
            return false;
        }

        let parsed = parse(&text, self.separators.delimiter);
        self.separators = parsed.separators;
        self.warnings = parsed.warnings;

        let mut data = parsed.grid;
        let titles = if self.header_mode {
            promote_header(&mut data)
        } else {
            None
        };
        self.columns.clear_titles();
        self.columns.resize(data.column_count());
        if let Some(titles) = titles {
            self.columns.set_titles(titles);
        }

        let Some(view) = self.view.as_mut() else {
            return false;
        };
        view.set_data(data);
        // The view may pad to its minimum dimensions
        self.columns.resize(view.column_count());
        let stale = view.columns() != self.columns.columns(view.column_count()).as_slice();
        self.pump_events();

        if stale {
            self.rebuild_view(|_| {});
        } else {
            self.relayout();
        }
        tracing::debug!("grid reloaded from document");
        true
    }

    /// Current grid as document text, including the header row while
    /// header mode is on
    pub fn serialize(&self) -> Option<String> {
        let view = self.view.as_ref()?;
        let data = view.data();
        let header = self
            .header_mode
            .then(|| header_row(self.columns.titles(), data.column_count()));
        Some(serialize_with_header(
            header.as_deref(),
            data,
            &self.separators,
        ))
    }

    fn persist(&mut self) {
        if let Some(text) = self.serialize() {
            self.document.set_text(&text);
        }
    }

    // === Event dispatch ===

    /// Drain the view's queued events and deliver them in order
    pub fn pump_events(&mut self) {
        self.dispatch_events(true);
    }

    fn dispatch_events(&mut self, notify_search: bool) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let events = view.take_events();
        if events.is_empty() {
            return;
        }

        let mut content_changed = false;
        for event in &events {
            match *event {
                GridEvent::ColumnsInserted { at, count } => {
                    self.columns.insert_columns(at, count);
                    self.layout.on_resize(view);
                }
                GridEvent::ColumnsDeleted { at, count } => {
                    self.columns.delete_columns(at, count);
                    self.layout.on_resize(view);
                }
                GridEvent::ColumnMoved { from, to } => self.columns.move_column(from, to),
                _ => {}
            }

            for id in self.listeners.recipients(event) {
                if Some(id) == self.persist_listener {
                    content_changed = true;
                } else if notify_search && Some(id) == self.search.listener_id() {
                    self.search.on_grid_changed(view);
                }
            }
        }
        self.type_bar.remeasure(&*view);

        if content_changed {
            self.persist();
        }
    }

    // === View rebuild ===

    /// Destroy the view and create a new one from its current options,
    /// adjusted by `update`. Widths are recomputed and search highlights
    /// reapplied, since neither survives the old view.
    fn rebuild_view(&mut self, update: impl FnOnce(&mut GridOptions)) {
        self.pump_events();
        let Some(mut old) = self.view.take() else {
            return;
        };

        let mut options = old.options();
        options.columns = self.columns.columns(options.data.column_count());
        update(&mut options);
        old.destroy();

        let mut view = V::create(options);
        self.layout.relayout(&mut view);
        self.search.on_view_rebuilt(&mut view);
        self.type_bar.remeasure(&view);
        self.view = Some(view);
    }

    fn relayout(&mut self) {
        if let Some(view) = self.view.as_mut() {
            self.layout.relayout(view);
            self.type_bar.remeasure(view);
        }
    }

    // === Toolbar actions ===

    pub fn insert_row(&mut self) -> bool {
        let Some(view) = self.view.as_mut() else {
            tracing::debug!("insert row before ready ignored");
            return false;
        };
        let at = view.row_count();
        view.insert_rows(at, 1);
        self.pump_events();
        true
    }

    /// Remove the last row, keeping at least one
    pub fn remove_row(&mut self) -> bool {
        let Some(view) = self.view.as_mut() else {
            tracing::debug!("remove row before ready ignored");
            return false;
        };
        let rows = view.row_count();
        if rows <= 1 {
            return false;
        }
        view.delete_rows(rows - 1, 1);
        self.pump_events();
        true
    }

    pub fn insert_column(&mut self) -> bool {
        let Some(view) = self.view.as_mut() else {
            tracing::debug!("insert column before ready ignored");
            return false;
        };
        let at = view.column_count();
        view.insert_columns(at, 1);
        self.pump_events();
        true
    }

    /// Remove the last column, keeping at least one
    pub fn remove_column(&mut self) -> bool {
        let Some(view) = self.view.as_mut() else {
            tracing::debug!("remove column before ready ignored");
            return false;
        };
        let cols = view.column_count();
        if cols <= 1 {
            return false;
        }
        view.delete_columns(cols - 1, 1);
        self.pump_events();
        true
    }

    /// Show or hide the row index. Returns the new visibility.
    pub fn toggle_index(&mut self) -> Option<bool> {
        let view = self.view.as_mut()?;
        let visible = !view.index_visible();
        view.set_index_visible(visible);
        self.layout.on_resize(view);
        self.type_bar.remeasure(view);
        Some(visible)
    }

    /// Advance the fit mode and relayout. Returns the new mode.
    pub fn cycle_fit_mode(&mut self) -> Option<FitMode> {
        let view = self.view.as_mut()?;
        let mode = self.layout.cycle_mode();
        self.layout.relayout(view);
        self.type_bar.remeasure(view);
        Some(mode)
    }

    pub fn set_fit_mode(&mut self, mode: FitMode) -> bool {
        let Some(view) = self.view.as_mut() else {
            return false;
        };
        self.layout.set_mode(mode);
        self.layout.relayout(view);
        self.type_bar.remeasure(view);
        true
    }

    /// Freeze every column up to the right-most selected one.
    ///
    /// Does nothing when no column is selected.
    pub fn freeze_selected_columns(&mut self) -> Option<usize> {
        let view = self.view.as_ref()?;
        let Some(count) = freeze_count(&view.selected_columns()) else {
            tracing::debug!("freeze without selected columns ignored");
            return None;
        };
        self.rebuild_view(|options| options.freeze_columns = Some(count));
        Some(count)
    }

    pub fn unfreeze_columns(&mut self) -> bool {
        if self.view.is_none() {
            return false;
        }
        self.rebuild_view(|options| options.freeze_columns = None);
        true
    }

    /// Switch between treating the first row as data and as column titles.
    ///
    /// The document text is the same in both modes. Returns the new mode.
    pub fn toggle_header(&mut self) -> Option<bool> {
        let view = self.view.as_ref()?;
        let mut data = view.data().clone();

        if self.header_mode {
            let titles = self.columns.clear_titles();
            demote_header(&mut data, &titles);
            self.header_mode = false;
        } else {
            let Some(titles) = promote_header(&mut data) else {
                return Some(false);
            };
            self.columns.set_titles(titles);
            self.header_mode = true;
        }

        self.rebuild_view(|options| options.data = data);
        if let Some(view) = self.view.as_mut() {
            self.search.on_grid_changed(view);
        }
        tracing::debug!(header = self.header_mode, "header mode toggled");
        Some(self.header_mode)
    }

    /// Declare the type of one column and rebuild the view with it
    pub fn set_column_type(&mut self, col: usize, kind: ColumnType) -> Result<(), ColumnError> {
        if self.view.is_none() {
            tracing::debug!("column type change before ready ignored");
            return Ok(());
        }
        self.columns.set_column_type(col, kind)?;
        self.rebuild_view(|_| {});
        Ok(())
    }

    /// Width set by dragging a column border
    pub fn resize_column(&mut self, col: usize, width: f32) {
        if let Some(view) = self.view.as_mut() {
            view.resize_column(col, width);
            self.pump_events();
        }
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        if let Some(view) = self.view.as_mut() {
            view.set_viewport_size(width, height);
            self.layout.on_resize(view);
            self.type_bar.remeasure(view);
        }
    }

    // === Cell editing ===

    /// Write one cell, as if typed into the grid
    pub fn set_cell(&mut self, pos: CellPosition, value: CellValue) -> bool {
        let Some(view) = self.view.as_mut() else {
            tracing::debug!("cell edit before ready ignored");
            return false;
        };
        let written = view.set_value(pos, value);
        self.pump_events();
        written
    }

    pub fn select(&mut self, selection: Option<Selection>) {
        if let Some(view) = self.view.as_mut() {
            view.set_selection(selection);
            self.pump_events();
        }
    }

    // === Search ===

    fn search_target(
        &mut self,
    ) -> Result<(&mut SearchProvider, &mut V, &mut Listeners), SearchError> {
        let view = self.view.as_mut().ok_or(SearchError::NoGrid)?;
        Ok((&mut self.search, view, &mut self.listeners))
    }

    /// Suggested query from the selected cell
    pub fn initial_query(&mut self) -> Result<String, SearchError> {
        let (search, view, _) = self.search_target()?;
        let query = search.initial_query(view);
        self.pump_events();
        Ok(query)
    }

    /// Start a search, returning the number of matches
    pub fn start_search(
        &mut self,
        query: &str,
        options: SearchOptions,
    ) -> Result<usize, SearchError> {
        let (search, view, listeners) = self.search_target()?;
        search.start_query(view, listeners, query, options);
        let count = search.matches_count();
        self.pump_events();
        Ok(count)
    }

    pub fn find_next(&mut self) -> Result<Option<SearchMatch>, SearchError> {
        let (search, view, _) = self.search_target()?;
        let found = search.highlight_next(view)?;
        self.pump_events();
        Ok(found)
    }

    pub fn find_previous(&mut self) -> Result<Option<SearchMatch>, SearchError> {
        let (search, view, _) = self.search_target()?;
        let found = search.highlight_previous(view)?;
        self.pump_events();
        Ok(found)
    }

    pub fn replace_current(&mut self, replacement: &str) -> Result<bool, SearchError> {
        let (search, view, _) = self.search_target()?;
        let replaced = search.replace_current_match(view, replacement)?;
        self.pump_events();
        Ok(replaced)
    }

    /// Replace every match. The search already re-indexed once, so the
    /// queued cell edits only update the document.
    pub fn replace_all(&mut self, replacement: &str) -> Result<usize, SearchError> {
        let (search, view, _) = self.search_target()?;
        let replaced = search.replace_all_matches(view, replacement)?;
        self.dispatch_events(false);
        Ok(replaced)
    }

    pub fn clear_highlight(&mut self) -> Result<(), SearchError> {
        let (search, view, _) = self.search_target()?;
        search.clear_highlight(view);
        Ok(())
    }

    pub fn end_search(&mut self) -> Result<(), SearchError> {
        let (search, view, listeners) = self.search_target()?;
        search.end_search(view, listeners);
        self.pump_events();
        Ok(())
    }
}
