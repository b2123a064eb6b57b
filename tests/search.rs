//! Find/replace tests driven through the sheet editor

mod common;

use common::{cells, rows, test_sheet, TestEditor};
use csvgrid::csv::{CellPosition, CellValue};
use csvgrid::grid::{GridView, Selection};
use csvgrid::messages::{Msg, SearchMsg};
use csvgrid::search::{SearchError, SearchOptions};
use csvgrid::sheet::{DocumentContext, SheetEditor, TextDocument};
use csvgrid::update::update;
use csvgrid::{Cmd, SheetConfig};

fn positions(editor: &TestEditor) -> Vec<(usize, usize, usize)> {
    editor
        .search()
        .matches()
        .iter()
        .map(|m| (m.row, m.col, m.position))
        .collect()
}

// ========================================================================
// Match Ordering and Navigation
// ========================================================================

#[test]
fn test_matches_are_row_major() {
    let mut editor = test_sheet("a,b\nc,ab", "t.csv");

    assert_eq!(editor.start_search("b", SearchOptions::default()), Ok(2));
    assert_eq!(positions(&editor), vec![(0, 1, 0), (1, 1, 0)]);

    assert_eq!(editor.start_search("a", SearchOptions::default()), Ok(2));
    assert_eq!(positions(&editor), vec![(0, 0, 0), (1, 1, 0)]);
}

#[test]
fn test_several_matches_in_one_cell_are_numbered() {
    let mut editor = test_sheet("banana,x", "t.csv");
    editor.start_search("an", SearchOptions::default()).unwrap();
    assert_eq!(positions(&editor), vec![(0, 0, 0), (0, 0, 1)]);
}

#[test]
fn test_navigation_wraps_both_ways() {
    let mut editor = test_sheet("a,a\na,a", "t.csv");
    assert_eq!(editor.start_search("a", SearchOptions::default()), Ok(4));
    assert_eq!(editor.search().current_match_index(), 0);

    let found = editor.find_previous().unwrap().unwrap();
    assert_eq!(found.pos(), CellPosition::new(1, 1));
    assert_eq!(editor.search().current_match_index(), 3);

    let found = editor.find_next().unwrap().unwrap();
    assert_eq!(found.pos(), CellPosition::new(0, 0));

    // The current match is selected
    let selection = editor.view().unwrap().selection();
    assert_eq!(selection, Some(Selection::single(CellPosition::new(0, 0))));
}

#[test]
fn test_options_change_matching() {
    let mut editor = test_sheet("Cat,cat\ncatalog,x", "t.csv");

    assert_eq!(editor.start_search("cat", SearchOptions::default()), Ok(2));

    let insensitive = SearchOptions {
        case_sensitive: false,
        ..SearchOptions::default()
    };
    assert_eq!(editor.start_search("cat", insensitive), Ok(3));

    let whole_word = SearchOptions {
        case_sensitive: false,
        whole_word: true,
        ..SearchOptions::default()
    };
    assert_eq!(editor.start_search("cat", whole_word), Ok(2));

    let regex = SearchOptions {
        regex: true,
        ..SearchOptions::default()
    };
    assert_eq!(editor.start_search("^c.t$", regex), Ok(1));
}

#[test]
fn test_invalid_regex_has_no_matches() {
    let mut editor = test_sheet("a,b", "t.csv");
    let regex = SearchOptions {
        regex: true,
        ..SearchOptions::default()
    };
    assert_eq!(editor.start_search("(", regex), Ok(0));
    assert!(editor.search().is_active());
    assert_eq!(editor.find_next(), Ok(None));
}

// ========================================================================
// Errors
// ========================================================================

#[test]
fn test_navigation_requires_a_started_search() {
    let mut editor = test_sheet("a,b", "t.csv");
    assert_eq!(editor.find_next(), Err(SearchError::NotStarted));
    assert_eq!(editor.replace_all("x"), Err(SearchError::NotStarted));
}

#[test]
fn test_search_requires_a_grid() {
    let mut editor: TestEditor =
        SheetEditor::new(TextDocument::pending(), &SheetConfig::default());
    assert!(!editor.on_ready());
    assert_eq!(
        editor.start_search("a", SearchOptions::default()),
        Err(SearchError::NoGrid)
    );
}

// ========================================================================
// Replacement
// ========================================================================

#[test]
fn test_replace_current_walks_through_one_cell() {
    let mut editor = test_sheet("aXaXa", "t.csv");
    assert_eq!(editor.start_search("a", SearchOptions::default()), Ok(3));

    assert_eq!(editor.replace_current("b"), Ok(true));
    assert_eq!(editor.document().text(), "bXaXa");
    assert_eq!(editor.search().matches_count(), 2);

    assert_eq!(editor.replace_current("b"), Ok(true));
    assert_eq!(editor.document().text(), "bXbXa");

    assert_eq!(editor.replace_current("b"), Ok(true));
    assert_eq!(editor.document().text(), "bXbXb");
    assert_eq!(editor.search().matches_count(), 0);

    assert_eq!(editor.replace_current("b"), Ok(false));
}

#[test]
fn test_replace_all_is_literal() {
    let mut editor = test_sheet("foo1,bar\nfoo22,x", "t.csv");
    let regex = SearchOptions {
        regex: true,
        ..SearchOptions::default()
    };
    assert_eq!(editor.start_search(r"foo\d+", regex), Ok(2));
    assert_eq!(editor.replace_all("$0"), Ok(2));
    assert_eq!(editor.document().text(), "$0,bar\n$0,x");
    assert_eq!(editor.search().matches_count(), 0);
}

#[test]
fn test_replace_all_without_matches_keeps_text() {
    let mut editor = test_sheet("a,b\n", "t.csv");
    editor.start_search("zzz", SearchOptions::default()).unwrap();
    assert_eq!(editor.replace_all("y"), Ok(0));
    assert_eq!(editor.document().text(), "a,b\n");
    assert!(!editor.document().is_modified);
}

// ========================================================================
// Keeping Matches in Sync
// ========================================================================

#[test]
fn test_edits_reindex_matches() {
    let mut editor = test_sheet("x,y\nz,w", "t.csv");
    editor.start_search("x", SearchOptions::default()).unwrap();
    assert_eq!(editor.search().matches_count(), 1);
    let generation = editor.search().generation();

    editor.set_cell(CellPosition::new(1, 1), CellValue::from("xx"));
    assert_eq!(editor.search().matches_count(), 3);
    assert!(editor.search().generation() > generation);

    editor.insert_row();
    editor.set_cell(CellPosition::new(2, 0), CellValue::from("x"));
    assert_eq!(editor.search().matches_count(), 4);
}

#[test]
fn test_external_change_reindexes_matches() {
    let mut editor = test_sheet("a,b", "t.csv");
    editor.start_search("a", SearchOptions::default()).unwrap();

    editor.document_mut().set_text("a,a\na,b");
    assert!(editor.on_content_changed());
    assert_eq!(editor.search().matches_count(), 3);
    assert_eq!(cells(&editor), rows(&[&["a", "a"], &["a", "b"]]));
}

#[test]
fn test_header_toggle_reindexes_matches() {
    let mut editor = test_sheet("name,x\nname2,y", "t.csv");
    editor.start_search("name", SearchOptions::default()).unwrap();
    assert_eq!(editor.search().matches_count(), 2);

    editor.toggle_header();
    assert_eq!(editor.search().matches_count(), 1);
    assert_eq!(editor.search().matches()[0].pos(), CellPosition::new(0, 0));
}

#[test]
fn test_end_search_detaches_and_clears_highlights() {
    let mut editor = test_sheet("a,b\na,c", "t.csv");
    let baseline = editor.listeners().len();

    editor.start_search("a", SearchOptions::default()).unwrap();
    assert_eq!(editor.listeners().len(), baseline + 1);
    assert_eq!(editor.view().unwrap().backlit_cells().len(), 2);

    editor.end_search().unwrap();
    assert_eq!(editor.listeners().len(), baseline);
    assert!(editor.view().unwrap().backlit_cells().is_empty());
    assert!(!editor.search().is_active());

    // Ending twice is harmless
    editor.end_search().unwrap();
}

// ========================================================================
// Message Flow
// ========================================================================

#[test]
fn test_search_messages_report_progress() {
    let mut editor = test_sheet("ab,b\nb,a", "t.csv");

    let cmd = update(&mut editor, Msg::find("b")).unwrap();
    assert!(cmd.needs_redraw());

    let cmd = update(&mut editor, Msg::Search(SearchMsg::Next)).unwrap();
    assert_eq!(
        cmd,
        Cmd::batch(vec![
            Cmd::redraw_grid(),
            Cmd::SearchChanged {
                matches: 3,
                current: 1
            },
        ])
    );

    update(&mut editor, Msg::Search(SearchMsg::ReplaceAll("c".into())));
    assert_eq!(editor.document().text(), "ac,c\nc,a");
}
