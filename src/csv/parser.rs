//! CSV parsing using the csv crate, and serialization back to text
//!
//! RFC 4180 compliant parsing with support for quoted fields,
//! escaped quotes, and custom delimiters. Serialization reuses the
//! delimiter and line-break style recorded at parse time so an
//! unchanged grid writes back byte-for-byte.

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;

use super::model::{CellValue, Delimiter, Grid, Linebreak, SeparatorState};

/// Number of records inspected when guessing the delimiter
const DETECT_PREVIEW_RECORDS: usize = 10;

/// Non-fatal problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line the record started on
    pub line: usize,
    pub kind: ParseWarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarningKind {
    /// Row had fewer fields than the grid and was padded
    Padded { expected: usize, found: usize },
    /// Row had more fields than the grid and was truncated
    Truncated { expected: usize, found: usize },
    /// The reader rejected the record; it was skipped
    Malformed(String),
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseWarningKind::Padded { expected, found } => write!(
                f,
                "line {}: expected {} fields, found {} (padded)",
                self.line, expected, found
            ),
            ParseWarningKind::Truncated { expected, found } => write!(
                f,
                "line {}: expected {} fields, found {} (truncated)",
                self.line, expected, found
            ),
            ParseWarningKind::Malformed(message) => {
                write!(f, "line {}: {} (skipped)", self.line, message)
            }
        }
    }
}

/// Result of parsing delimited text
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub grid: Grid,
    pub separators: SeparatorState,
    pub warnings: Vec<ParseWarning>,
}

/// Parse delimited text into a rectangular grid.
///
/// When `known` is `None` the delimiter is detected from the text. Ragged
/// rows are fitted to the dominant field count and reported as warnings.
pub fn parse(content: &str, known: Option<Delimiter>) -> Parsed {
    let delimiter = known.unwrap_or_else(|| detect_delimiter(content));
    let separators = SeparatorState {
        delimiter: Some(delimiter),
        linebreak: detect_linebreak(content),
        trailing_linebreak: content.ends_with('\n') || content.ends_with('\r'),
    };

    let mut warnings = Vec::new();
    let records = read_records(content, delimiter, usize::MAX, &mut warnings);
    let width = dominant_width(&records);

    let mut rows = Vec::with_capacity(records.len());
    for (line, fields) in records {
        let found = fields.len();
        if found < width {
            warnings.push(ParseWarning {
                line,
                kind: ParseWarningKind::Padded {
                    expected: width,
                    found,
                },
            });
        } else if found > width {
            warnings.push(ParseWarning {
                line,
                kind: ParseWarningKind::Truncated {
                    expected: width,
                    found,
                },
            });
        }
        rows.push(fields.iter().map(|f| CellValue::from_field(f)).collect());
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            first = %warnings[0],
            "Parsing errors encountered"
        );
    }

    Parsed {
        grid: Grid::from_rows_with_width(rows, width),
        separators,
        warnings,
    }
}

/// Read raw records as `(line, fields)`, turning reader errors into warnings
fn read_records(
    content: &str,
    delimiter: Delimiter,
    limit: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<(usize, Vec<String>)> {
    let cursor = Cursor::new(content.as_bytes());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.char() as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(cursor);

    let mut records = Vec::new();
    for (index, result) in reader.records().take(limit).enumerate() {
        match result {
            Ok(record) => {
                let line = record
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(index + 1);
                records.push((line, record.iter().map(|s| s.to_string()).collect()));
            }
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(index + 1);
                warnings.push(ParseWarning {
                    line,
                    kind: ParseWarningKind::Malformed(e.to_string()),
                });
            }
        }
    }
    records
}

/// Most frequent field count; ties go to the wider row
fn dominant_width(records: &[(usize, Vec<String>)]) -> usize {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for (_, fields) in records {
        *counts.entry(fields.len()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(w1, n1), (w2, n2)| n1.cmp(n2).then(w1.cmp(w2)))
        .map(|(width, _)| width)
        .unwrap_or(0)
}

/// Detect delimiter from the structure of the first records.
///
/// A delimiter that splits every preview row into the same number of fields
/// (and more than one) wins; ties go to the one producing more fields.
pub fn detect_delimiter(content: &str) -> Delimiter {
    let mut best: Option<(Delimiter, usize, f64)> = None;

    for candidate in Delimiter::CANDIDATES {
        let mut ignored = Vec::new();
        let records = read_records(content, candidate, DETECT_PREVIEW_RECORDS, &mut ignored);
        if records.is_empty() {
            continue;
        }

        let counts: Vec<usize> = records.iter().map(|(_, f)| f.len()).collect();
        let avg = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        if avg < 1.99 {
            continue;
        }
        let delta: usize = counts.windows(2).map(|w| w[0].abs_diff(w[1])).sum();

        let better = match best {
            None => true,
            Some((_, best_delta, best_avg)) => {
                delta < best_delta || (delta == best_delta && avg > best_avg)
            }
        };
        if better {
            best = Some((candidate, delta, avg));
        }
    }

    best.map(|(d, _, _)| d).unwrap_or_default()
}

/// Detect the style of the first line break outside a quoted field
pub fn detect_linebreak(content: &str) -> Linebreak {
    let bytes = content.as_bytes();
    let mut in_quotes = false;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'\r' if !in_quotes => {
                return if bytes.get(i + 1) == Some(&b'\n') {
                    Linebreak::CrLf
                } else {
                    Linebreak::Cr
                };
            }
            b'\n' if !in_quotes => return Linebreak::Lf,
            _ => {}
        }
    }

    Linebreak::Lf
}

/// Escape a single field for writing, quoting only when required
pub fn escape_csv_value(value: &str, delimiter: Delimiter) -> String {
    let needs_quotes = value.contains(delimiter.char())
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');

    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serialize a grid with the given separators
pub fn serialize(grid: &Grid, separators: &SeparatorState) -> String {
    serialize_with_header(None, grid, separators)
}

/// Serialize a grid, optionally prepending a header row
pub fn serialize_with_header(
    header: Option<&[CellValue]>,
    grid: &Grid,
    separators: &SeparatorState,
) -> String {
    let delimiter = separators.delimiter_or_default();
    let linebreak = separators.linebreak.as_str();

    let mut out = String::new();
    let mut first = true;
    for row in header.into_iter().chain(grid.rows().iter().map(|r| r.as_slice())) {
        if !first {
            out.push_str(linebreak);
        }
        first = false;
        // A lone empty field would be a blank line, which the reader skips
        if let [only] = row {
            if only.is_empty() {
                out.push_str("\"\"");
                continue;
            }
        }
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push(delimiter.char());
            }
            out.push_str(&escape_csv_value(&cell.to_string(), delimiter));
        }
    }

    if separators.trailing_linebreak && !first {
        out.push_str(linebreak);
    }
    out
}
