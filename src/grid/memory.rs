//! In-memory grid view
//!
//! A headless [`GridView`] with pixel geometry derived from character
//! metrics. Used by the CLI, the tests and the benchmarks.

use std::collections::HashSet;

use unicode_width::UnicodeWidthStr;

use crate::columns::ColumnDescriptor;
use crate::csv::{column_to_letters, CellPosition, CellValue, Grid};

use super::{GridEvent, GridOptions, GridView, Rect, Selection};

/// Pixel metrics used to lay out and measure cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    /// Advance of one terminal-width character
    pub char_width: f32,
    /// Horizontal padding added around cell text
    pub cell_padding: f32,
    pub row_height: f32,
    pub header_height: f32,
    /// Width of the row-index gutter while it is visible
    pub gutter_width: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            cell_padding: 12.0,
            row_height: 24.0,
            header_height: 24.0,
            gutter_width: 50.0,
        }
    }
}

impl GridMetrics {
    /// Rendered width of `text`: widest line plus padding
    pub fn text_width(&self, text: &str) -> f32 {
        let chars = text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
        chars as f32 * self.char_width + self.cell_padding
    }
}

#[derive(Debug, Clone)]
pub struct MemoryGrid {
    data: Grid,
    columns: Vec<ColumnDescriptor>,
    widths: Vec<f32>,
    default_column_width: f32,
    freeze_columns: Option<usize>,
    min_dimensions: (usize, usize),
    index_visible: bool,
    metrics: GridMetrics,
    viewport_size: (f32, f32),
    scroll: (f32, f32),
    selection: Option<Selection>,
    backlit: HashSet<CellPosition>,
    events: Vec<GridEvent>,
    destroyed: bool,
}

impl MemoryGrid {
    /// Shorthand for a view over `data` with default options
    pub fn with_data(data: Grid) -> Self {
        Self::create(GridOptions {
            data,
            ..GridOptions::default()
        })
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn metrics(&self) -> GridMetrics {
        self.metrics
    }

    /// Cells currently carrying a highlight marker
    pub fn backlit_cells(&self) -> &HashSet<CellPosition> {
        &self.backlit
    }

    /// Current `(left, top)` scroll offsets of the scrollable area
    pub fn scroll_offsets(&self) -> (f32, f32) {
        self.scroll
    }

    fn push_event(&mut self, event: GridEvent) {
        if !self.destroyed {
            self.events.push(event);
        }
    }

    fn fit_columns(&mut self) {
        let count = self.data.column_count();
        self.widths.resize(count, self.default_column_width);
        self.columns.resize(count, ColumnDescriptor::default());
    }

    fn clamp_selection(&mut self) {
        let rows = self.data.row_count();
        let cols = self.data.column_count();
        if let Some(sel) = self.selection {
            if rows == 0 || cols == 0 || sel.start.row >= rows || sel.start.col >= cols {
                self.selection = None;
            } else {
                let end = CellPosition::new(sel.end.row.min(rows - 1), sel.end.col.min(cols - 1));
                self.selection = Some(Selection::new(sel.start, end));
            }
        }
    }

    fn frozen_count(&self) -> usize {
        self.freeze_columns
            .unwrap_or(0)
            .min(self.data.column_count())
    }

    fn frozen_width(&self) -> f32 {
        self.widths[..self.frozen_count()].iter().sum()
    }

    fn column_offset(&self, col: usize) -> f32 {
        self.widths[..col.min(self.widths.len())].iter().sum()
    }

    fn after_structure_change(&mut self) {
        self.clamp_selection();
        let rows = self.data.row_count();
        let cols = self.data.column_count();
        self.backlit.retain(|p| p.row < rows && p.col < cols);
    }
}

impl GridView for MemoryGrid {
    fn create(options: GridOptions) -> Self {
        let GridOptions {
            mut data,
            columns,
            freeze_columns,
            default_column_width,
            min_dimensions,
            index_visible,
            metrics,
            viewport_size,
        } = options;

        data.ensure_dimensions(min_dimensions.0, min_dimensions.1);
        let mut grid = Self {
            data,
            columns,
            widths: Vec::new(),
            default_column_width,
            freeze_columns,
            min_dimensions,
            index_visible,
            metrics,
            viewport_size,
            scroll: (0.0, 0.0),
            selection: None,
            backlit: HashSet::new(),
            events: Vec::new(),
            destroyed: false,
        };
        grid.fit_columns();
        grid
    }

    fn options(&self) -> GridOptions {
        GridOptions {
            data: self.data.clone(),
            columns: self.columns.clone(),
            freeze_columns: self.freeze_columns,
            default_column_width: self.default_column_width,
            min_dimensions: self.min_dimensions,
            index_visible: self.index_visible,
            metrics: self.metrics,
            viewport_size: self.viewport_size,
        }
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.backlit.clear();
        self.selection = None;
        self.events.clear();
    }

    fn data(&self) -> &Grid {
        &self.data
    }

    fn set_data(&mut self, mut grid: Grid) {
        grid.ensure_dimensions(self.min_dimensions.0, self.min_dimensions.1);
        self.data = grid;
        self.fit_columns();
        self.after_structure_change();
        self.push_event(GridEvent::DataReplaced);
    }

    fn value(&self, pos: CellPosition) -> Option<&CellValue> {
        self.data.get(pos)
    }

    fn set_value(&mut self, pos: CellPosition, value: CellValue) -> bool {
        if self.data.get(pos) == Some(&value) {
            return true;
        }
        if !self.data.set(pos, value) {
            return false;
        }
        self.push_event(GridEvent::CellChanged { pos });
        true
    }

    fn insert_rows(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        let at = at.min(self.data.row_count());
        self.data.insert_rows(at, count);
        self.after_structure_change();
        self.push_event(GridEvent::RowsInserted { at, count });
    }

    fn delete_rows(&mut self, at: usize, count: usize) {
        let removed = self.data.delete_rows(at, count);
        if removed == 0 {
            return;
        }
        self.after_structure_change();
        self.push_event(GridEvent::RowsDeleted { at, count: removed });
    }

    fn move_row(&mut self, from: usize, to: usize) {
        if from != to && self.data.move_row(from, to) {
            self.push_event(GridEvent::RowMoved { from, to });
        }
    }

    fn insert_columns(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        let at = at.min(self.data.column_count());
        self.data.insert_columns(at, count);
        let width = self.default_column_width;
        self.widths
            .splice(at..at, std::iter::repeat(width).take(count));
        self.columns.splice(
            at..at,
            std::iter::repeat(ColumnDescriptor::default()).take(count),
        );
        self.after_structure_change();
        self.push_event(GridEvent::ColumnsInserted { at, count });
    }

    fn delete_columns(&mut self, at: usize, count: usize) {
        let removed = self.data.delete_columns(at, count);
        if removed == 0 {
            return;
        }
        self.widths.drain(at..at + removed);
        self.columns.drain(at..at + removed);
        self.after_structure_change();
        self.push_event(GridEvent::ColumnsDeleted { at, count: removed });
    }

    fn move_column(&mut self, from: usize, to: usize) {
        if from == to || !self.data.move_column(from, to) {
            return;
        }
        let width = self.widths.remove(from);
        self.widths.insert(to, width);
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        self.push_event(GridEvent::ColumnMoved { from, to });
    }

    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    fn freeze_columns(&self) -> Option<usize> {
        self.freeze_columns
    }

    fn default_column_width(&self) -> f32 {
        self.default_column_width
    }

    fn column_width(&self, col: usize) -> Option<f32> {
        self.widths.get(col).copied()
    }

    fn set_column_width(&mut self, col: usize, width: f32) {
        if let Some(slot) = self.widths.get_mut(col) {
            *slot = width.max(0.0);
        }
    }

    fn resize_column(&mut self, col: usize, width: f32) {
        if col < self.widths.len() {
            self.set_column_width(col, width);
            self.push_event(GridEvent::ColumnResized {
                col,
                width: self.widths[col],
            });
        }
    }

    fn gutter_width(&self) -> f32 {
        if self.index_visible {
            self.metrics.gutter_width
        } else {
            0.0
        }
    }

    fn set_index_visible(&mut self, visible: bool) {
        self.index_visible = visible;
    }

    fn index_visible(&self) -> bool {
        self.index_visible
    }

    fn measure_cell(&self, pos: CellPosition) -> f32 {
        match self.data.get(pos) {
            Some(value) => self.metrics.text_width(&value.to_string()),
            None => 0.0,
        }
    }

    fn measure_header(&self, col: usize) -> f32 {
        let label = self
            .columns
            .get(col)
            .and_then(|c| c.title.clone())
            .unwrap_or_else(|| column_to_letters(col));
        self.metrics.text_width(&label)
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
        self.clamp_selection();
        let selection = self.selection;
        self.push_event(GridEvent::SelectionChanged(selection));
    }

    fn cell_rect(&self, pos: CellPosition) -> Option<Rect> {
        if pos.row >= self.data.row_count() || pos.col >= self.data.column_count() {
            return None;
        }
        let width = self.widths[pos.col];
        let y = pos.row as f32 * self.metrics.row_height;

        if pos.col < self.frozen_count() {
            // Pinned columns never need horizontal scrolling
            let viewport = self.scroll_viewport();
            return Some(Rect::new(
                viewport.x,
                y,
                width.min(viewport.width),
                self.metrics.row_height,
            ));
        }

        Some(Rect::new(
            self.column_offset(pos.col),
            y,
            width,
            self.metrics.row_height,
        ))
    }

    fn scroll_viewport(&self) -> Rect {
        let frozen = self.frozen_width();
        let width = (self.viewport_size.0 - self.gutter_width() - frozen).max(0.0);
        let height = (self.viewport_size.1 - self.metrics.header_height).max(0.0);
        Rect::new(self.scroll.0 + frozen, self.scroll.1, width, height)
    }

    fn scroll_to(&mut self, left: f32, top: f32) {
        let left = (left - self.frozen_width()).max(0.0);
        self.scroll = (left, top.max(0.0));
    }

    fn viewport_size(&self) -> (f32, f32) {
        self.viewport_size
    }

    fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_size = (width.max(0.0), height.max(0.0));
    }

    fn set_backlight(&mut self, pos: CellPosition, on: bool) {
        if on {
            if pos.row < self.data.row_count() && pos.col < self.data.column_count() {
                self.backlit.insert(pos);
            }
        } else {
            self.backlit.remove(&pos);
        }
    }

    fn is_backlit(&self, pos: CellPosition) -> bool {
        self.backlit.contains(&pos)
    }

    fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }
}
