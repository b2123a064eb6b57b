//! Column layout
//!
//! Computes one pixel width per column under one of three fit policies and
//! applies it to the grid view. The policy is cycled by a toolbar action:
//!
//! ```text
//! FitCells ──▶ AllEqualFit ──▶ AllEqualDefault ──▶ FitCells
//! ```

mod type_bar;

pub use type_bar::ColumnTypeBar;

use crate::csv::CellPosition;
use crate::grid::GridView;

/// Narrowest width `FitCells` will assign
pub const MIN_COLUMN_WIDTH: f32 = 25.0;

/// `FitCells` is chosen on load only below this many cells
pub const FIT_CELLS_THRESHOLD: usize = 100 * 100;

/// Column width policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Every column gets the grid view's default width
    #[default]
    AllEqualDefault,
    /// Available width (viewport minus row-index gutter) split equally
    AllEqualFit,
    /// Each column as wide as its widest cell or header
    FitCells,
}

impl FitMode {
    /// Next mode in the toolbar cycle
    pub fn next(self) -> Self {
        match self {
            FitMode::FitCells => FitMode::AllEqualFit,
            FitMode::AllEqualFit => FitMode::AllEqualDefault,
            FitMode::AllEqualDefault => FitMode::FitCells,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FitMode::AllEqualDefault => "all-equal-default",
            FitMode::AllEqualFit => "all-equal-fit",
            FitMode::FitCells => "fit-cells",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all-equal-default" | "default" => Some(FitMode::AllEqualDefault),
            "all-equal-fit" | "fit" => Some(FitMode::AllEqualFit),
            "fit-cells" | "cells" => Some(FitMode::FitCells),
            _ => None,
        }
    }
}

/// Frozen column count for a freeze action: everything up to and including
/// the right-most selected column. `None` when nothing is selected.
pub fn freeze_count(selected_columns: &[usize]) -> Option<usize> {
    selected_columns.iter().max().map(|max| max + 1)
}

/// Width computation for the current fit mode
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    mode: FitMode,
    min_column_width: f32,
    fit_cells_threshold: usize,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(MIN_COLUMN_WIDTH, FIT_CELLS_THRESHOLD)
    }
}

impl LayoutEngine {
    pub fn new(min_column_width: f32, fit_cells_threshold: usize) -> Self {
        Self {
            mode: FitMode::AllEqualDefault,
            min_column_width,
            fit_cells_threshold,
        }
    }

    pub fn mode(&self) -> FitMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: FitMode) {
        self.mode = mode;
    }

    /// Advance to the next mode and return it
    pub fn cycle_mode(&mut self) -> FitMode {
        self.mode = self.mode.next();
        tracing::debug!(mode = self.mode.name(), "fit mode changed");
        self.mode
    }

    /// Pick the load-time mode: `FitCells` for small grids, where measuring
    /// every cell is affordable, `AllEqualDefault` otherwise.
    pub fn choose_initial_mode(&mut self, rows: usize, cols: usize) -> FitMode {
        self.mode = if rows > 0 && rows.saturating_mul(cols) < self.fit_cells_threshold {
            FitMode::FitCells
        } else {
            FitMode::AllEqualDefault
        };
        self.mode
    }

    /// One width per column of `view` under the current mode
    pub fn compute_widths(&self, view: &dyn GridView) -> Vec<f32> {
        let columns = view.column_count();
        if columns == 0 {
            return Vec::new();
        }

        match self.mode {
            FitMode::AllEqualDefault => vec![view.default_column_width(); columns],
            FitMode::AllEqualFit => {
                let available = (view.viewport_size().0 - view.gutter_width()).max(0.0);
                vec![available / columns as f32; columns]
            }
            FitMode::FitCells => (0..columns)
                .map(|col| {
                    (0..view.row_count())
                        .map(|row| view.measure_cell(CellPosition::new(row, col)))
                        .fold(
                            self.min_column_width.max(view.measure_header(col)),
                            f32::max,
                        )
                })
                .collect(),
        }
    }

    /// Compute and apply widths. Returns false when the view has no columns.
    pub fn relayout(&self, view: &mut dyn GridView) -> bool {
        let widths = self.compute_widths(view);
        if widths.is_empty() {
            return false;
        }
        for (col, width) in widths.into_iter().enumerate() {
            view.set_column_width(col, width);
        }
        true
    }

    /// React to a viewport resize or column count change.
    ///
    /// Only `AllEqualFit` depends on the viewport, so the other modes keep
    /// their widths.
    pub fn on_resize(&self, view: &mut dyn GridView) -> bool {
        if self.mode == FitMode::AllEqualFit {
            self.relayout(view)
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::Grid;
    use crate::grid::{GridOptions, MemoryGrid};

    fn view(rows: Vec<Vec<&str>>) -> MemoryGrid {
        MemoryGrid::create(GridOptions {
            data: Grid::from_strings(rows),
            viewport_size: (330.0, 200.0),
            ..GridOptions::default()
        })
    }

    #[test]
    fn test_mode_cycle() {
        assert_eq!(FitMode::FitCells.next(), FitMode::AllEqualFit);
        assert_eq!(FitMode::AllEqualFit.next(), FitMode::AllEqualDefault);
        assert_eq!(FitMode::AllEqualDefault.next(), FitMode::FitCells);
    }

    #[test]
    fn test_all_equal_fit_splits_available_width() {
        let mut view = view(vec![vec!["a", "b", "c"]]);
        view.set_viewport_size(300.0, 200.0);
        let mut engine = LayoutEngine::default();
        engine.set_mode(FitMode::AllEqualFit);

        let widths = engine.compute_widths(&view);
        assert_eq!(widths.len(), 3);
        assert!((widths[0] - 250.0 / 3.0).abs() < 1e-4);

        // Hidden index gives the gutter back to the columns
        view.set_index_visible(false);
        assert_eq!(engine.compute_widths(&view), vec![100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_all_equal_default_ignores_viewport() {
        let mut view = view(vec![vec!["a", "b", "c"]]);
        let mut engine = LayoutEngine::default();
        engine.set_mode(FitMode::AllEqualFit);
        engine.relayout(&mut view);

        engine.set_mode(FitMode::AllEqualDefault);
        view.set_viewport_size(5000.0, 200.0);
        engine.relayout(&mut view);
        assert_eq!(view.column_widths(), vec![50.0, 50.0, 50.0]);
    }

    #[test]
    fn test_fit_cells_uses_widest_cell_and_minimum() {
        let view = view(vec![vec!["a", "a much longer value"], vec!["bb", ""]]);
        let mut engine = LayoutEngine::default();
        engine.set_mode(FitMode::FitCells);

        let widths = engine.compute_widths(&view);
        // "a"/"bb"/"A" all measure below the minimum
        assert_eq!(widths[0], MIN_COLUMN_WIDTH.max(2.0 * 8.0 + 12.0));
        assert_eq!(widths[1], 19.0 * 8.0 + 12.0);
    }

    #[test]
    fn test_initial_mode_threshold() {
        let mut engine = LayoutEngine::default();
        assert_eq!(engine.choose_initial_mode(99, 100), FitMode::FitCells);
        assert_eq!(engine.choose_initial_mode(100, 100), FitMode::AllEqualDefault);
        assert_eq!(engine.choose_initial_mode(0, 3), FitMode::AllEqualDefault);

        let mut small = LayoutEngine::new(MIN_COLUMN_WIDTH, 10);
        assert_eq!(small.choose_initial_mode(3, 4), FitMode::AllEqualDefault);
    }

    #[test]
    fn test_on_resize_only_refits_in_fit_mode() {
        let mut view = view(vec![vec!["a", "b"]]);
        let mut engine = LayoutEngine::default();
        assert!(!engine.on_resize(&mut view));

        engine.set_mode(FitMode::AllEqualFit);
        assert!(engine.on_resize(&mut view));
        assert_eq!(view.column_widths(), vec![140.0, 140.0]);
    }

    #[test]
    fn test_freeze_count() {
        assert_eq!(freeze_count(&[0, 2, 1]), Some(3));
        assert_eq!(freeze_count(&[]), None);
    }
}
