//! Message types for the Elm-style architecture
//!
//! All state changes a host UI triggers flow through these message types.

use crate::columns::ColumnType;
use crate::csv::{CellPosition, CellValue};
use crate::grid::Selection;
use crate::search::SearchOptions;

/// Document lifecycle, toolbar and grid interaction messages
#[derive(Debug, Clone)]
pub enum SheetMsg {
    /// The host finished loading the document
    Ready,
    /// The document text changed outside the grid
    ContentChanged,

    // === Toolbar ===
    InsertRowAtEnd,
    RemoveLastRow,
    InsertColumnAtEnd,
    RemoveLastColumn,
    ToggleIndex,
    CycleFitMode,
    FreezeSelectedColumns,
    UnfreezeColumns,
    ToggleHeader,
    SetColumnType { col: usize, kind: ColumnType },

    // === Grid interaction ===
    /// User dragged a column border
    ResizeColumn { col: usize, width: f32 },
    /// Host viewport size changed
    ResizeViewport { width: f32, height: f32 },
    /// A cell edit committed in the grid
    SetCell { pos: CellPosition, value: CellValue },
    Select(Option<Selection>),
}

/// Find/replace messages
#[derive(Debug, Clone)]
pub enum SearchMsg {
    /// Start (or restart) a query
    Start { query: String, options: SearchOptions },
    Next,
    Previous,
    ReplaceCurrent(String),
    ReplaceAll(String),
    ClearHighlight,
    /// Search box closed
    End,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Sheet(SheetMsg),
    Search(SearchMsg),
}

impl Msg {
    /// Create a find message for a literal query
    pub fn find(query: &str) -> Self {
        Msg::Search(SearchMsg::Start {
            query: query.to_string(),
            options: SearchOptions::default(),
        })
    }
}
