//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use csvgrid::config::SheetConfig;
use csvgrid::csv::Grid;
use csvgrid::grid::{GridView, MemoryGrid};
use csvgrid::sheet::{SheetEditor, TextDocument};

pub type TestEditor = SheetEditor<MemoryGrid, TextDocument>;

/// A ready sheet over `text`, bound to a file named `path`
pub fn test_sheet(text: &str, path: &str) -> TestEditor {
    test_sheet_with_config(text, path, &SheetConfig::default())
}

pub fn test_sheet_with_config(text: &str, path: &str, config: &SheetConfig) -> TestEditor {
    let mut editor = SheetEditor::new(TextDocument::with_text(text).with_path(path), config);
    assert!(editor.on_ready(), "sheet failed to initialize");
    editor
}

/// Cell contents of the view as strings, row by row
pub fn cells(editor: &TestEditor) -> Vec<Vec<String>> {
    editor
        .view()
        .map(|view| grid_strings(view.data()))
        .unwrap_or_default()
}

pub fn grid_strings(grid: &Grid) -> Vec<Vec<String>> {
    grid.rows()
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect()
}

/// Column widths currently applied to the view
pub fn widths(editor: &TestEditor) -> Vec<f32> {
    editor
        .view()
        .map(|view| view.column_widths())
        .unwrap_or_default()
}

/// Owned string rows for comparing against [`cells`]
pub fn rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect()
}
