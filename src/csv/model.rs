//! CSV data model types
//!
//! The grid is stored row-major as `Vec<Vec<CellValue>>` and kept rectangular:
//! every constructor and structural mutation pads or trims each row to the
//! stored column count.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported CSV delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// Candidates tried by delimiter detection, in tie-break order
    pub const CANDIDATES: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Tab,
        Delimiter::Pipe,
        Delimiter::Semicolon,
    ];

    /// Get the character for this delimiter
    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
        }
    }

    /// Delimiter pinned by a file extension.
    ///
    /// Only `csv` and `tsv` pin a delimiter; everything else is auto-detected.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Delimiter::Comma),
            "tsv" => Some(Delimiter::Tab),
            _ => None,
        }
    }
}

/// Line-break style of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linebreak {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl Linebreak {
    pub fn as_str(self) -> &'static str {
        match self {
            Linebreak::Lf => "\n",
            Linebreak::CrLf => "\r\n",
            Linebreak::Cr => "\r",
        }
    }
}

/// Delimiter and line-break style used to write a grid back to text.
///
/// `delimiter == None` means "not known yet": the next parse detects it and
/// pins it for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeparatorState {
    pub delimiter: Option<Delimiter>,
    pub linebreak: Linebreak,
    /// Whether the source text ended with a line break
    pub trailing_linebreak: bool,
}

impl SeparatorState {
    pub fn new(delimiter: Option<Delimiter>) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }

    /// Delimiter to write with (comma until one has been detected)
    pub fn delimiter_or_default(&self) -> Delimiter {
        self.delimiter.unwrap_or_default()
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Value for a parsed field: empty fields become `Empty`
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(field.to_string())
        }
    }

    /// True for `Empty` and for empty text
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::from_field(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

/// Position of a cell in the grid.
///
/// Ordering is row-major, which is also the order search matches are reported in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Rectangular cell storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    column_count: usize,
}

impl Grid {
    /// Create empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid from rows, padding short rows to the widest one
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let column_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Self::from_rows_with_width(rows, column_count)
    }

    /// Create a grid with an explicit column count, padding or truncating rows
    pub fn from_rows_with_width(mut rows: Vec<Vec<CellValue>>, column_count: usize) -> Self {
        for row in &mut rows {
            row.resize(column_count, CellValue::Empty);
        }
        Self { rows, column_count }
    }

    /// Convenience constructor from string slices
    pub fn from_strings<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_rows(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|s| CellValue::from_field(s.as_ref()))
                        .collect()
                })
                .collect(),
        )
    }

    /// Get number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Check if data is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.column_count == 0
    }

    /// Get cell value at position
    pub fn get(&self, pos: CellPosition) -> Option<&CellValue> {
        self.rows.get(pos.row)?.get(pos.col)
    }

    /// Set cell value at position, returning false when out of bounds
    pub fn set(&mut self, pos: CellPosition, value: CellValue) -> bool {
        match self.rows.get_mut(pos.row).and_then(|r| r.get_mut(pos.col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        self.rows.get(row).map(|r| r.as_slice())
    }

    /// Iterate over `(position, value)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellPosition, &CellValue)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, value)| (CellPosition::new(r, c), value))
        })
    }

    /// Insert `count` empty rows before `at` (clamped to the end)
    pub fn insert_rows(&mut self, at: usize, count: usize) {
        let at = at.min(self.rows.len());
        let blank = vec![CellValue::Empty; self.column_count];
        self.rows
            .splice(at..at, std::iter::repeat(blank).take(count));
    }

    /// Insert a row of values before `at`, fitted to the column count
    pub fn insert_row_values(&mut self, at: usize, mut values: Vec<CellValue>) {
        if self.rows.is_empty() && self.column_count == 0 {
            self.column_count = values.len();
        }
        values.resize(self.column_count, CellValue::Empty);
        let at = at.min(self.rows.len());
        self.rows.insert(at, values);
    }

    /// Remove up to `count` rows starting at `at`, returning how many were removed
    pub fn delete_rows(&mut self, at: usize, count: usize) -> usize {
        if at >= self.rows.len() {
            return 0;
        }
        let end = (at + count).min(self.rows.len());
        self.rows.drain(at..end);
        end - at
    }

    /// Remove and return the first row
    pub fn take_first_row(&mut self) -> Option<Vec<CellValue>> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.rows.remove(0))
        }
    }

    pub fn move_row(&mut self, from: usize, to: usize) -> bool {
        if from >= self.rows.len() || to >= self.rows.len() {
            return false;
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        true
    }

    /// Insert `count` empty columns before `at` (clamped to the end)
    pub fn insert_columns(&mut self, at: usize, count: usize) {
        let at = at.min(self.column_count);
        for row in &mut self.rows {
            row.splice(at..at, std::iter::repeat(CellValue::Empty).take(count));
        }
        self.column_count += count;
    }

    /// Remove up to `count` columns starting at `at`, returning how many were removed
    pub fn delete_columns(&mut self, at: usize, count: usize) -> usize {
        if at >= self.column_count {
            return 0;
        }
        let end = (at + count).min(self.column_count);
        for row in &mut self.rows {
            row.drain(at..end);
        }
        self.column_count -= end - at;
        end - at
    }

    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        if from >= self.column_count || to >= self.column_count {
            return false;
        }
        for row in &mut self.rows {
            let cell = row.remove(from);
            row.insert(to, cell);
        }
        true
    }

    /// Grow to at least `rows` x `cols`
    pub fn ensure_dimensions(&mut self, rows: usize, cols: usize) {
        if self.column_count < cols {
            let missing = cols - self.column_count;
            self.insert_columns(self.column_count, missing);
        }
        if self.rows.len() < rows {
            let missing = rows - self.rows.len();
            self.insert_rows(self.rows.len(), missing);
        }
    }

    /// Every row has exactly `column_count` cells
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|r| r.len() == self.column_count)
    }
}
