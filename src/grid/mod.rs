//! Grid view seam
//!
//! The grid view is the widget that stores, renders and edits cells. The
//! engine only talks to it through [`GridView`], so a real renderer and the
//! in-memory [`MemoryGrid`] are interchangeable.
//!
//! # Notifications
//!
//! Mutations queue a [`GridEvent`] inside the view. The owner of the view
//! drains the queue right after each operation ([`GridView::take_events`])
//! and hands every event to the listeners registered in [`Listeners`] for
//! that kind of event, in mutation order.

mod events;
mod memory;
mod viewport;

pub use events::{EventMask, GridEvent, GridEventKind, ListenerId, Listeners};
pub use memory::{GridMetrics, MemoryGrid};
pub use viewport::{scroll_into_view, Rect};

use crate::columns::ColumnDescriptor;
use crate::csv::{CellPosition, CellValue, Grid};

/// A rectangular selection, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: CellPosition,
    pub end: CellPosition,
}

impl Selection {
    /// Create a new selection, normalizing so start <= end on both axes
    pub fn new(a: CellPosition, b: CellPosition) -> Self {
        Self {
            start: CellPosition::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellPosition::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a single-cell selection
    pub fn single(pos: CellPosition) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Check if this is a single cell
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, pos: CellPosition) -> bool {
        pos.row >= self.start.row
            && pos.row <= self.end.row
            && pos.col >= self.start.col
            && pos.col <= self.end.col
    }

    /// Number of selected rows
    pub fn rows(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    /// Number of selected columns
    pub fn columns(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    pub fn row_indices(&self) -> impl Iterator<Item = usize> {
        self.start.row..=self.end.row
    }

    pub fn column_indices(&self) -> impl Iterator<Item = usize> {
        self.start.col..=self.end.col
    }
}

/// Configuration a grid view is created with.
///
/// Structural settings (frozen columns, column descriptors) can only be
/// changed by destroying the view and creating a new one from updated options.
#[derive(Debug, Clone)]
pub struct GridOptions {
    pub data: Grid,
    pub columns: Vec<ColumnDescriptor>,
    pub freeze_columns: Option<usize>,
    pub default_column_width: f32,
    /// Minimum `(rows, columns)` the view pads its data to
    pub min_dimensions: (usize, usize),
    pub index_visible: bool,
    pub metrics: GridMetrics,
    /// Visible `(width, height)` in pixels, including the row-index gutter
    pub viewport_size: (f32, f32),
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            data: Grid::new(),
            columns: Vec::new(),
            freeze_columns: None,
            default_column_width: 50.0,
            min_dimensions: (1, 1),
            index_visible: true,
            metrics: GridMetrics::default(),
            viewport_size: (800.0, 600.0),
        }
    }
}

/// Operations the engine needs from the grid widget
pub trait GridView {
    /// Build a view from options
    fn create(options: GridOptions) -> Self
    where
        Self: Sized;

    /// Snapshot of the current configuration, including the current data
    fn options(&self) -> GridOptions;

    /// Tear down the view. Highlight markers, selection and pending events are lost.
    fn destroy(&mut self);

    // === Data ===

    fn data(&self) -> &Grid;

    /// Replace all data. Queues [`GridEvent::DataReplaced`].
    fn set_data(&mut self, grid: Grid);

    fn value(&self, pos: CellPosition) -> Option<&CellValue>;

    /// Write one cell. Queues [`GridEvent::CellChanged`] when the value changed.
    fn set_value(&mut self, pos: CellPosition, value: CellValue) -> bool;

    fn row_count(&self) -> usize {
        self.data().row_count()
    }

    fn column_count(&self) -> usize {
        self.data().column_count()
    }

    // === Structure ===

    fn insert_rows(&mut self, at: usize, count: usize);
    fn delete_rows(&mut self, at: usize, count: usize);
    fn move_row(&mut self, from: usize, to: usize);
    fn insert_columns(&mut self, at: usize, count: usize);
    fn delete_columns(&mut self, at: usize, count: usize);
    fn move_column(&mut self, from: usize, to: usize);

    // === Columns and widths ===

    fn columns(&self) -> &[ColumnDescriptor];
    fn freeze_columns(&self) -> Option<usize>;
    fn default_column_width(&self) -> f32;
    fn column_width(&self, col: usize) -> Option<f32>;

    /// Set a column width programmatically (no resize event)
    fn set_column_width(&mut self, col: usize, width: f32);

    /// Width set by the user dragging a column border. Queues [`GridEvent::ColumnResized`].
    fn resize_column(&mut self, col: usize, width: f32);

    fn column_widths(&self) -> Vec<f32> {
        (0..self.column_count())
            .map(|c| self.column_width(c).unwrap_or_else(|| self.default_column_width()))
            .collect()
    }

    /// Width of the row-index gutter (zero while the index is hidden)
    fn gutter_width(&self) -> f32;
    fn set_index_visible(&mut self, visible: bool);
    fn index_visible(&self) -> bool;

    /// Rendered width of a cell's content
    fn measure_cell(&self, pos: CellPosition) -> f32;

    /// Rendered width of a column header
    fn measure_header(&self, col: usize) -> f32;

    // === Selection ===

    fn selection(&self) -> Option<Selection>;

    /// Change the selection. Queues [`GridEvent::SelectionChanged`].
    fn set_selection(&mut self, selection: Option<Selection>);

    fn selected_columns(&self) -> Vec<usize> {
        self.selection()
            .map(|s| s.column_indices().collect())
            .unwrap_or_default()
    }

    fn selected_rows(&self) -> Vec<usize> {
        self.selection()
            .map(|s| s.row_indices().collect())
            .unwrap_or_default()
    }

    // === Geometry ===

    /// Rectangle of a cell in scrollable content coordinates
    fn cell_rect(&self, pos: CellPosition) -> Option<Rect>;

    /// Visible part of the scrollable content (x/y are the scroll offsets)
    fn scroll_viewport(&self) -> Rect;

    fn scroll_to(&mut self, left: f32, top: f32);

    fn viewport_size(&self) -> (f32, f32);
    fn set_viewport_size(&mut self, width: f32, height: f32);

    // === Highlight markers ===

    fn set_backlight(&mut self, pos: CellPosition, on: bool);
    fn is_backlit(&self, pos: CellPosition) -> bool;

    // === Notifications ===

    /// Drain queued change notifications in the order they happened
    fn take_events(&mut self) -> Vec<GridEvent>;
}
