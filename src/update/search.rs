//! Find/replace update functions

use crate::commands::Cmd;
use crate::grid::GridView;
use crate::messages::SearchMsg;
use crate::search::SearchError;
use crate::sheet::{DocumentContext, SheetEditor};

/// Handle search messages
pub fn update_search<V: GridView, D: DocumentContext>(
    editor: &mut SheetEditor<V, D>,
    msg: SearchMsg,
) -> Option<Cmd> {
    let result = match msg {
        SearchMsg::Start { query, options } => editor.start_search(&query, options).map(|_| ()),
        SearchMsg::Next => editor.find_next().map(|_| ()),
        SearchMsg::Previous => editor.find_previous().map(|_| ()),
        SearchMsg::ReplaceCurrent(text) => editor.replace_current(&text).map(|_| ()),
        SearchMsg::ReplaceAll(text) => editor.replace_all(&text).map(|_| ()),
        SearchMsg::ClearHighlight => editor.clear_highlight(),
        SearchMsg::End => editor.end_search(),
    };

    match result {
        Ok(()) => Some(Cmd::batch(vec![
            Cmd::redraw_grid(),
            Cmd::SearchChanged {
                matches: editor.search().matches_count(),
                current: editor.search().current_match_index(),
            },
        ])),
        Err(SearchError::NoGrid) => {
            tracing::debug!("search message before ready ignored");
            None
        }
        Err(e) => {
            tracing::warn!("Search failed: {}", e);
            None
        }
    }
}
