//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod search;
mod sheet;

use crate::commands::Cmd;
use crate::grid::GridView;
use crate::messages::Msg;
use crate::sheet::{DocumentContext, SheetEditor};

pub use search::update_search;
pub use sheet::update_sheet;

#[cfg(debug_assertions)]
use crate::tracing::SheetSnapshot;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this logs a diff of the sheet state around each message.
#[inline]
pub fn update<V: GridView, D: DocumentContext>(
    editor: &mut SheetEditor<V, D>,
    msg: Msg,
) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(editor, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(editor, msg)
    }
}

fn update_inner<V: GridView, D: DocumentContext>(
    editor: &mut SheetEditor<V, D>,
    msg: Msg,
) -> Option<Cmd> {
    match msg {
        Msg::Sheet(m) => update_sheet(editor, m),
        Msg::Search(m) => update_search(editor, m),
    }
}

#[cfg(debug_assertions)]
fn update_traced<V: GridView, D: DocumentContext>(
    editor: &mut SheetEditor<V, D>,
    msg: Msg,
) -> Option<Cmd> {
    let msg_name = format!("{:?}", msg);
    let before = SheetSnapshot::from_editor(editor);

    let result = update_inner(editor, msg);

    let after = SheetSnapshot::from_editor(editor);
    if let Some(diff) = before.diff(&after) {
        tracing::debug!(target: "state", msg = %msg_name, "{}", diff);
    }
    result
}
