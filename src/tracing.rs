//! Tracing setup and state-diff diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=csvgrid::search=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/csvgrid/logs/csvgrid.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::grid::{GridView, Selection};
use crate::sheet::{DocumentContext, SheetEditor};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`. File logging
/// writes to `~/.config/csvgrid/logs/csvgrid.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console goes to stderr so `--json` output stays parseable
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of sheet state for diffing around an update
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSnapshot {
    pub rows: usize,
    pub columns: usize,
    pub selection: Option<Selection>,
    pub matches: usize,
    pub current_match: usize,
    pub header: bool,
}

impl SheetSnapshot {
    pub fn from_editor<V: GridView, D: DocumentContext>(editor: &SheetEditor<V, D>) -> Self {
        let view = editor.view();
        Self {
            rows: view.map(|v| v.row_count()).unwrap_or(0),
            columns: view.map(|v| v.column_count()).unwrap_or(0),
            selection: view.and_then(|v| v.selection()),
            matches: editor.search().matches_count(),
            current_match: editor.search().current_match_index(),
            header: editor.header_mode(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SheetSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if (self.rows, self.columns) != (other.rows, other.columns) {
            changes.push(format!(
                "size: {}x{} → {}x{}",
                self.rows, self.columns, other.rows, other.columns
            ));
        }
        if self.selection != other.selection {
            let describe = |s: &Option<Selection>| match s {
                Some(s) => format!(
                    "({},{})-({},{})",
                    s.start.row, s.start.col, s.end.row, s.end.col
                ),
                None => "none".to_string(),
            };
            changes.push(format!(
                "selection: {} → {}",
                describe(&self.selection),
                describe(&other.selection)
            ));
        }
        if (self.matches, self.current_match) != (other.matches, other.current_match) {
            changes.push(format!(
                "matches: {}@{} → {}@{}",
                self.matches, self.current_match, other.matches, other.current_match
            ));
        }
        if self.header != other.header {
            changes.push(format!("header: {} → {}", self.header, other.header));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
