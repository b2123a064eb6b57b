//! Delimited-text codec
//!
//! Converts between the flat text of a CSV/TSV document and the rectangular
//! cell grid shown by the sheet editor:
//! - delimiter detection (pinned by `.csv`/`.tsv`, otherwise guessed once)
//! - line-break detection, reused verbatim on write
//! - ragged rows fitted to the dominant width, reported as warnings
//! - header promotion/demotion
//!
//! ```text
//! text ──parse──▶ Parsed { grid, separators, warnings }
//!  ▲                         │
//!  └──────serialize──────────┘
//! ```

mod header;
mod model;
mod parser;

pub use header::{column_to_letters, demote_header, header_row, promote_header};
pub use model::{CellPosition, CellValue, Delimiter, Grid, Linebreak, SeparatorState};
pub use parser::{
    detect_delimiter, detect_linebreak, escape_csv_value, parse, serialize,
    serialize_with_header, ParseWarning, ParseWarningKind, Parsed,
};
