//! Search and replace inside the grid
//!
//! ```text
//! Idle ──start_query──▶ Querying ──end_query──▶ Idle
//!                        │    ▲
//!           grid change  └────┘  re-index, keep current match
//! ```
//!
//! Matches are kept in row-major order and identified by
//! `(row, col, position)`, where `position` is the ordinal of the match
//! inside its cell. Only a window of matches around the current one carries
//! a highlight marker in the view.

mod pattern;
mod provider;

pub use pattern::{Pattern, SearchOptions};
pub use provider::{SearchMatch, SearchProvider, BACKLIGHT_WINDOW, SCROLL_MARGIN};

use std::fmt;

/// Caller errors from the search engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// Navigation or replacement without a running query
    NotStarted,
    /// The editor has no grid view yet
    NoGrid,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NotStarted => write!(f, "no search is running"),
            SearchError::NoGrid => write!(f, "the sheet has no grid view yet"),
        }
    }
}

impl std::error::Error for SearchError {}
