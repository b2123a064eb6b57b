//! Sheet update functions
//!
//! Handles SheetMsg messages: document lifecycle, toolbar actions and grid
//! interaction.

use crate::commands::{Cmd, DamageArea};
use crate::grid::GridView;
use crate::messages::SheetMsg;
use crate::sheet::{DocumentContext, SheetEditor};

/// Handle sheet messages
pub fn update_sheet<V: GridView, D: DocumentContext>(
    editor: &mut SheetEditor<V, D>,
    msg: SheetMsg,
) -> Option<Cmd> {
    match msg {
        SheetMsg::Ready => editor.on_ready().then(Cmd::redraw_layout),
        SheetMsg::ContentChanged => editor.on_content_changed().then(Cmd::redraw_layout),

        SheetMsg::InsertRowAtEnd => editor.insert_row().then(Cmd::redraw_grid),
        SheetMsg::RemoveLastRow => editor.remove_row().then(Cmd::redraw_grid),
        SheetMsg::InsertColumnAtEnd => editor.insert_column().then(Cmd::redraw_layout),
        SheetMsg::RemoveLastColumn => editor.remove_column().then(Cmd::redraw_layout),
        SheetMsg::ToggleIndex => editor.toggle_index().map(|_| Cmd::redraw_layout()),
        SheetMsg::CycleFitMode => editor.cycle_fit_mode().map(|_| Cmd::redraw_layout()),
        SheetMsg::FreezeSelectedColumns => editor
            .freeze_selected_columns()
            .map(|_| Cmd::redraw_layout()),
        SheetMsg::UnfreezeColumns => editor.unfreeze_columns().then(Cmd::redraw_layout),
        SheetMsg::ToggleHeader => editor.toggle_header().map(|_| Cmd::redraw_layout()),
        SheetMsg::SetColumnType { col, kind } => match editor.set_column_type(col, kind) {
            Ok(()) => Some(Cmd::redraw_layout()),
            Err(e) => {
                tracing::warn!("Failed to set column type: {}", e);
                None
            }
        },

        SheetMsg::ResizeColumn { col, width } => {
            editor.resize_column(col, width);
            Some(Cmd::RedrawAreas(vec![DamageArea::Grid, DamageArea::TypeBar]))
        }
        SheetMsg::ResizeViewport { width, height } => {
            editor.set_viewport_size(width, height);
            Some(Cmd::redraw_layout())
        }
        SheetMsg::SetCell { pos, value } => editor.set_cell(pos, value).then(Cmd::redraw_grid),
        SheetMsg::Select(selection) => {
            editor.select(selection);
            Some(Cmd::redraw_grid())
        }
    }
}
