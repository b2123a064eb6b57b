//! Stateful search over a grid view

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::csv::{CellPosition, CellValue};
use crate::grid::{
    scroll_into_view, EventMask, GridEventKind, GridView, ListenerId, Listeners, Selection,
};

use super::pattern::{Pattern, SearchOptions};
use super::SearchError;

/// Highlight markers kept around the current match
pub const BACKLIGHT_WINDOW: usize = 1000;

/// Soft margin kept between a revealed match and the viewport edge
pub const SCROLL_MARGIN: f32 = 3.0;

/// One occurrence of the query inside a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub row: usize,
    pub col: usize,
    /// Ordinal among the matches in the same cell
    pub position: usize,
    pub text: String,
}

impl SearchMatch {
    pub fn pos(&self) -> CellPosition {
        CellPosition::new(self.row, self.col)
    }

    fn key(&self) -> (usize, usize, usize) {
        (self.row, self.col, self.position)
    }
}

impl PartialOrd for SearchMatch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchMatch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key()
            .cmp(&other.key())
            .then_with(|| self.text.cmp(&other.text))
    }
}

#[derive(Debug)]
struct Session {
    pattern: Option<Pattern>,
    listener: ListenerId,
}

/// Finds, tracks, highlights and replaces query matches in a grid view.
///
/// A session runs from [`start_query`](Self::start_query) to
/// [`end_query`](Self::end_query). While it runs, the provider holds a
/// listener in the editor's registry and expects
/// [`on_grid_changed`](Self::on_grid_changed) for every content event.
#[derive(Debug)]
pub struct SearchProvider {
    session: Option<Session>,
    matches: Vec<SearchMatch>,
    current: usize,
    backlit: HashSet<CellPosition>,
    /// Cell picked by `initial_query`, consumed by the next indexing pass
    seed: Option<CellPosition>,
    /// Selection to put back when the search closes
    restore_selection: Option<Selection>,
    backlight_window: usize,
    scroll_margin: f32,
    generation: u64,
}

impl Default for SearchProvider {
    fn default() -> Self {
        Self::new(BACKLIGHT_WINDOW, SCROLL_MARGIN)
    }
}

impl SearchProvider {
    pub fn new(backlight_window: usize, scroll_margin: f32) -> Self {
        Self {
            session: None,
            matches: Vec::new(),
            current: 0,
            backlit: HashSet::new(),
            seed: None,
            restore_selection: None,
            backlight_window,
            scroll_margin,
            generation: 0,
        }
    }

    // === Accessors ===

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn matches_count(&self) -> usize {
        self.matches.len()
    }

    /// Index of the current match; 0 when there are no matches
    pub fn current_match_index(&self) -> usize {
        self.current
    }

    pub fn current_match(&self) -> Option<&SearchMatch> {
        self.matches.get(self.current)
    }

    pub fn query(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.pattern.as_ref())
            .map(Pattern::query)
    }

    pub fn listener_id(&self) -> Option<ListenerId> {
        self.session.as_ref().map(|s| s.listener)
    }

    /// Bumped every time matches were refreshed after a grid change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn backlit(&self) -> &HashSet<CellPosition> {
        &self.backlit
    }

    // === Session lifecycle ===

    /// Query text suggested by the selection: the value of the single
    /// selected cell, which also becomes the first current match.
    ///
    /// Without a usable value the selection is dropped so typing into the
    /// search box cannot overwrite the last edited cell.
    pub fn initial_query(&mut self, view: &mut dyn GridView) -> String {
        let selected = view
            .selection()
            .filter(Selection::is_single)
            .map(|s| s.start);
        self.seed = selected;

        if let Some(pos) = selected {
            if let Some(value) = view.value(pos).filter(|v| !v.is_empty()) {
                return value.to_string();
            }
        }
        view.set_selection(None);
        String::new()
    }

    /// Start a session for `query`, ending any running one first
    pub fn start_query(
        &mut self,
        view: &mut dyn GridView,
        listeners: &mut Listeners,
        query: &str,
        options: SearchOptions,
    ) {
        if self.session.is_some() {
            let seed = self.seed.take();
            self.end_query(view, listeners);
            self.seed = seed;
        }

        let listener = listeners.subscribe(EventMask::CONTENT.with(GridEventKind::DataReplaced));
        self.session = Some(Session {
            pattern: Pattern::compile(query, options),
            listener,
        });
        self.restore_selection = view.selection();

        self.find_matches(view, true);
        tracing::debug!(query, matches = self.matches.len(), "search started");
    }

    /// Detach from the grid and drop all matches and highlights.
    ///
    /// Safe to call when no session is running.
    pub fn end_query(&mut self, view: &mut dyn GridView, listeners: &mut Listeners) {
        self.backlight_off(view);
        self.current = 0;
        self.matches.clear();
        self.seed = None;
        if let Some(session) = self.session.take() {
            listeners.unsubscribe(session.listener);
            tracing::debug!("search ended");
        }
    }

    /// Close the search, putting back the last selection if the view has none
    pub fn end_search(&mut self, view: &mut dyn GridView, listeners: &mut Listeners) {
        if let Some(selection) = self.restore_selection.take() {
            if view.selection().is_none() {
                view.set_selection(Some(selection));
            }
        }
        self.end_query(view, listeners);
    }

    // === Indexing ===

    /// Rebuild the match list with a row-major scan of the view.
    ///
    /// The initial pass starts at the seeded cell (or the first match) and
    /// reveals it when `highlight_first` is set. Later passes keep the
    /// current match on the same `(row, col, position)` key, or the first
    /// match after it, without navigating.
    pub fn find_matches(&mut self, view: &mut dyn GridView, highlight_first: bool) -> usize {
        let seed = self.seed.take();
        let anchor = if highlight_first {
            None
        } else {
            self.current_match().map(SearchMatch::key)
        };

        let Some(pattern) = self.session.as_ref().and_then(|s| s.pattern.as_ref()) else {
            self.matches.clear();
            self.current = 0;
            return 0;
        };

        let mut matches = Vec::new();
        let mut seeded = None;
        for (pos, value) in view.data().cells() {
            if value.is_empty() {
                continue;
            }
            let text = value.to_string();
            let before = matches.len();
            matches.extend(
                pattern
                    .find_all(&text)
                    .enumerate()
                    .map(|(position, found)| SearchMatch {
                        row: pos.row,
                        col: pos.col,
                        position,
                        text: found.to_string(),
                    }),
            );
            if seed == Some(pos) && matches.len() > before {
                seeded = Some(before);
            }
        }

        self.current = match (seeded, anchor) {
            (Some(index), _) => index,
            (None, Some(key)) => matches
                .iter()
                .position(|m| m.key() >= key)
                .unwrap_or(matches.len().saturating_sub(1)),
            (None, None) => 0,
        };
        self.matches = matches;

        if highlight_first && !self.matches.is_empty() {
            self.highlight(view, self.current);
        }
        self.matches.len()
    }

    /// React to a content change in the view: re-index, rebuild the
    /// highlight window and bump the generation.
    pub fn on_grid_changed(&mut self, view: &mut dyn GridView) {
        if self.session.is_none() {
            return;
        }
        self.find_matches(view, false);
        self.backlight_off(view);
        self.backlight_matches(view);
        self.generation += 1;
    }

    /// Reapply highlights after the view was destroyed and recreated.
    ///
    /// The data is unchanged, so the matches stay valid; only the markers
    /// died with the old view.
    pub fn on_view_rebuilt(&mut self, view: &mut dyn GridView) {
        self.backlit.clear();
        if self.session.is_some() {
            self.backlight_matches(view);
        }
    }

    // === Navigation ===

    pub fn highlight_next(
        &mut self,
        view: &mut dyn GridView,
    ) -> Result<Option<SearchMatch>, SearchError> {
        self.ensure_started()?;
        if self.current + 1 < self.matches.len() {
            self.current += 1;
        } else {
            self.current = 0;
        }
        Ok(self.reveal_current(view))
    }

    pub fn highlight_previous(
        &mut self,
        view: &mut dyn GridView,
    ) -> Result<Option<SearchMatch>, SearchError> {
        self.ensure_started()?;
        if self.current > 0 {
            self.current -= 1;
        } else {
            self.current = self.matches.len().saturating_sub(1);
        }
        Ok(self.reveal_current(view))
    }

    fn reveal_current(&mut self, view: &mut dyn GridView) -> Option<SearchMatch> {
        let found = self.matches.get(self.current).cloned()?;
        self.highlight(view, self.current);
        Some(found)
    }

    /// Select the match's cell and scroll it into view if it is not fully
    /// visible already
    fn highlight(&mut self, view: &mut dyn GridView, index: usize) {
        self.backlight_matches(view);
        let Some(pos) = self.matches.get(index).map(SearchMatch::pos) else {
            return;
        };

        let selection = Selection::single(pos);
        view.set_selection(Some(selection));
        self.restore_selection = Some(selection);

        if let Some(cell) = view.cell_rect(pos) {
            if let Some((left, top)) =
                scroll_into_view(view.scroll_viewport(), cell, self.scroll_margin)
            {
                view.scroll_to(left, top);
            }
        }
    }

    // === Highlight window ===

    /// Mark the cells of the matches around the current one, at most
    /// `backlight_window` matches
    pub fn backlight_matches(&mut self, view: &mut dyn GridView) {
        let half = self.backlight_window / 2;
        let start = self.current.saturating_sub(half);
        let end = (self.current + self.backlight_window.div_ceil(2)).min(self.matches.len());

        for found in self.matches.get(start..end).unwrap_or_default() {
            let pos = found.pos();
            if self.backlit.insert(pos) {
                view.set_backlight(pos, true);
            }
        }
    }

    pub fn clear_highlight(&mut self, view: &mut dyn GridView) {
        self.backlight_off(view);
    }

    fn backlight_off(&mut self, view: &mut dyn GridView) {
        for pos in self.backlit.drain() {
            view.set_backlight(pos, false);
        }
    }

    // === Replacement ===

    /// Replace the current match and move to the next one.
    ///
    /// Returns whether a replacement happened.
    pub fn replace_current_match(
        &mut self,
        view: &mut dyn GridView,
        replacement: &str,
    ) -> Result<bool, SearchError> {
        self.ensure_started()?;
        Ok(self.replace_at(view, self.current, replacement, false))
    }

    /// Replace every match, then re-index once.
    ///
    /// Returns the number of occurrences actually replaced.
    pub fn replace_all_matches(
        &mut self,
        view: &mut dyn GridView,
        replacement: &str,
    ) -> Result<usize, SearchError> {
        self.ensure_started()?;

        let mut replaced = 0;
        for index in 0..self.matches.len() {
            self.current = index;
            if self.replace_at(view, index, replacement, true) {
                replaced += 1;
            }
        }

        self.current = 0;
        self.find_matches(view, false);
        self.backlight_off(view);
        self.backlight_matches(view);
        tracing::debug!(replaced, remaining = self.matches.len(), "replaced all matches");
        Ok(replaced)
    }

    fn replace_at(
        &mut self,
        view: &mut dyn GridView,
        index: usize,
        replacement: &str,
        bulk: bool,
    ) -> bool {
        let Some(pattern) = self.session.as_ref().and_then(|s| s.pattern.clone()) else {
            return false;
        };
        let Some(found) = self.matches.get(index).cloned() else {
            return false;
        };
        let pos = found.pos();

        let text = view.value(pos).map(CellValue::to_string).unwrap_or_default();
        let (new_text, in_cell, replaced) =
            pattern.replace_nth(&text, found.position, replacement);

        // Later matches in the same cell move down one ordinal
        for later in self.matches[index + 1..].iter_mut() {
            if later.pos() != pos {
                break;
            }
            later.position = later.position.saturating_sub(1);
        }

        if replaced {
            view.set_value(pos, CellValue::from(new_text));
        }

        if !bulk {
            if in_cell == 1 && self.backlit.remove(&pos) {
                view.set_backlight(pos, false);
            }
            self.current = if self.current + 1 < self.matches.len() {
                self.current + 1
            } else {
                0
            };
            self.reveal_current(view);
        }
        replaced
    }

    fn ensure_started(&self) -> Result<(), SearchError> {
        if self.session.is_some() {
            Ok(())
        } else {
            Err(SearchError::NotStarted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::Grid;
    use crate::grid::{GridOptions, MemoryGrid};

    fn view(rows: Vec<Vec<&str>>) -> MemoryGrid {
        MemoryGrid::with_data(Grid::from_strings(rows))
    }

    fn start(view: &mut MemoryGrid, listeners: &mut Listeners, query: &str) -> SearchProvider {
        let mut search = SearchProvider::default();
        search.start_query(view, listeners, query, SearchOptions::default());
        search
    }

    fn keys(search: &SearchProvider) -> Vec<(usize, usize, usize)> {
        search.matches().iter().map(SearchMatch::key).collect()
    }

    #[test]
    fn test_matches_are_row_major() {
        let mut view = view(vec![vec!["a", "b"], vec!["c", "ab"]]);
        let mut listeners = Listeners::new();
        let search = start(&mut view, &mut listeners, "a");

        assert_eq!(keys(&search), vec![(0, 0, 0), (1, 1, 0)]);
        assert_eq!(view.selection(), Some(Selection::single(CellPosition::new(0, 0))));
        assert!(listeners.is_subscribed(search.listener_id().unwrap()));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut view = view(vec![vec!["x", "x"], vec!["", "x"]]);
        let mut listeners = Listeners::new();
        let mut search = start(&mut view, &mut listeners, "x");

        assert_eq!(search.highlight_next(&mut view).unwrap().unwrap().col, 1);
        search.highlight_next(&mut view).unwrap();
        assert_eq!(search.current_match_index(), 2);
        search.highlight_next(&mut view).unwrap();
        assert_eq!(search.current_match_index(), 0);
        search.highlight_previous(&mut view).unwrap();
        assert_eq!(search.current_match_index(), 2);
        assert_eq!(view.selection(), Some(Selection::single(CellPosition::new(1, 1))));
    }

    #[test]
    fn test_no_matches_navigation_returns_none() {
        let mut view = view(vec![vec!["a"]]);
        let mut listeners = Listeners::new();
        let mut search = start(&mut view, &mut listeners, "zzz");

        assert_eq!(search.highlight_next(&mut view).unwrap(), None);
        assert_eq!(search.highlight_previous(&mut view).unwrap(), None);
        assert_eq!(search.current_match_index(), 0);
    }

    #[test]
    fn test_not_started_errors() {
        let mut view = view(vec![vec!["a"]]);
        let mut search = SearchProvider::default();
        assert_eq!(
            search.highlight_next(&mut view),
            Err(SearchError::NotStarted)
        );
        assert_eq!(
            search.replace_current_match(&mut view, "b"),
            Err(SearchError::NotStarted)
        );
    }

    #[test]
    fn test_replace_shifts_positions_in_same_cell() {
        let mut view = view(vec![vec!["aXaXa"]]);
        let mut listeners = Listeners::new();
        let mut search = start(&mut view, &mut listeners, "X");
        assert_eq!(keys(&search), vec![(0, 0, 0), (0, 0, 1)]);

        assert!(search.replace_current_match(&mut view, "Y").unwrap());
        assert_eq!(view.value(CellPosition::new(0, 0)), Some(&CellValue::from("aYaXa")));
        assert_eq!(search.matches()[1].position, 0);
        assert_eq!(search.current_match_index(), 1);

        assert!(search.replace_current_match(&mut view, "Y").unwrap());
        assert_eq!(view.value(CellPosition::new(0, 0)), Some(&CellValue::from("aYaYa")));
    }

    #[test]
    fn test_reindex_keeps_current_match() {
        let mut view = view(vec![vec!["aXaXa"]]);
        let mut listeners = Listeners::new();
        let mut search = start(&mut view, &mut listeners, "X");

        search.replace_current_match(&mut view, "Y").unwrap();
        let events = view.take_events();
        assert!(events.iter().any(|e| e.changes_content()));
        search.on_grid_changed(&mut view);

        assert_eq!(keys(&search), vec![(0, 0, 0)]);
        assert_eq!(search.current_match_index(), 0);
        assert_eq!(search.generation(), 1);
    }

    #[test]
    fn test_replace_all() {
        let mut view = view(vec![vec!["aXaXa", "X"], vec!["b", "XX"]]);
        let mut listeners = Listeners::new();
        let mut search = start(&mut view, &mut listeners, "X");
        assert_eq!(search.matches_count(), 5);

        assert_eq!(search.replace_all_matches(&mut view, "-"), Ok(5));
        assert_eq!(
            view.data(),
            &Grid::from_strings(vec![vec!["a-a-a", "-"], vec!["b", "--"]])
        );
        assert_eq!(search.matches_count(), 0);
        assert!(search.backlit().is_empty());
    }

    #[test]
    fn test_backlight_window_is_bounded() {
        let rows: Vec<Vec<&str>> = (0..20).map(|_| vec!["m"]).collect();
        let mut view = view(rows);
        let mut listeners = Listeners::new();
        let mut search = SearchProvider::new(6, SCROLL_MARGIN);
        search.start_query(&mut view, &mut listeners, "m", SearchOptions::default());

        assert_eq!(search.backlit().len(), 3);
        for _ in 0..10 {
            search.highlight_next(&mut view).unwrap();
        }
        search.clear_highlight(&mut view);
        search.backlight_matches(&mut view);
        assert_eq!(search.backlit().len(), 6);
        assert!(view.is_backlit(CellPosition::new(7, 0)));
        assert!(!view.is_backlit(CellPosition::new(6, 0)));
        assert!(view.is_backlit(CellPosition::new(12, 0)));
    }

    #[test]
    fn test_highlight_scrolls_with_margin() {
        let rows: Vec<Vec<&str>> = (0..100)
            .map(|i| if i == 60 { vec!["hit"] } else { vec![""] })
            .collect();
        let mut view = MemoryGrid::create(GridOptions {
            data: Grid::from_strings(rows),
            viewport_size: (400.0, 224.0),
            ..GridOptions::default()
        });
        let mut listeners = Listeners::new();
        start(&mut view, &mut listeners, "hit");

        // Row 60 spans 1440..1464 and the viewport is 200 high
        assert_eq!(view.scroll_offsets(), (0.0, 1267.0));
    }

    #[test]
    fn test_navigation_inside_viewport_does_not_scroll() {
        let rows: Vec<Vec<&str>> = (0..100)
            .map(|i| if i == 58 || i == 60 { vec!["hit"] } else { vec![""] })
            .collect();
        let mut view = MemoryGrid::create(GridOptions {
            data: Grid::from_strings(rows),
            viewport_size: (400.0, 224.0),
            ..GridOptions::default()
        });
        let mut listeners = Listeners::new();
        let mut search = start(&mut view, &mut listeners, "hit");
        assert_eq!(view.scroll_offsets(), (0.0, 1219.0));

        // Row 60 is below the fold
        search.highlight_next(&mut view).unwrap();
        assert_eq!(view.scroll_offsets(), (0.0, 1267.0));

        // Row 58 (1392..1416) is already fully visible
        search.highlight_previous(&mut view).unwrap();
        assert_eq!(search.current_match_index(), 0);
        assert_eq!(view.scroll_offsets(), (0.0, 1267.0));

        search.highlight_next(&mut view).unwrap();
        search.highlight_next(&mut view).unwrap();
        assert_eq!(search.current_match_index(), 0);
        assert_eq!(view.scroll_offsets(), (0.0, 1267.0));
    }

    #[test]
    fn test_initial_query_seeds_current_match() {
        let mut view = view(vec![vec!["a", "b"], vec!["a", "c"]]);
        view.set_selection(Some(Selection::single(CellPosition::new(1, 0))));
        let mut listeners = Listeners::new();
        let mut search = SearchProvider::default();

        let query = search.initial_query(&mut view);
        assert_eq!(query, "a");
        search.start_query(&mut view, &mut listeners, &query, SearchOptions::default());
        assert_eq!(search.current_match_index(), 1);
    }

    #[test]
    fn test_initial_query_without_value_clears_selection() {
        let mut view = view(vec![vec!["", "b"]]);
        view.set_selection(Some(Selection::single(CellPosition::new(0, 0))));
        let mut search = SearchProvider::default();

        assert_eq!(search.initial_query(&mut view), "");
        assert_eq!(view.selection(), None);
    }

    #[test]
    fn test_end_search_restores_selection_and_is_idempotent() {
        let mut view = view(vec![vec!["a", "b"]]);
        let mut listeners = Listeners::new();
        let mut search = start(&mut view, &mut listeners, "b");
        view.set_selection(None);

        search.end_search(&mut view, &mut listeners);
        assert_eq!(view.selection(), Some(Selection::single(CellPosition::new(0, 1))));
        assert!(listeners.is_empty());
        assert!(!search.is_active());

        search.end_query(&mut view, &mut listeners);
        assert_eq!(search.matches_count(), 0);
    }

    #[test]
    fn test_invalid_regex_has_no_matches() {
        let mut view = view(vec![vec!["(a"]]);
        let mut listeners = Listeners::new();
        let mut search = SearchProvider::default();
        let options = SearchOptions {
            regex: true,
            ..SearchOptions::default()
        };
        search.start_query(&mut view, &mut listeners, "(a", options);

        assert!(search.is_active());
        assert_eq!(search.matches_count(), 0);
        assert!(!search.replace_current_match(&mut view, "b").unwrap());
    }
}
