//! Per-column type and title state
//!
//! The column model is the source of the column descriptors handed to the
//! grid view whenever it is (re)built. Types and titles are kept index-aligned
//! with the grid's columns across inserts, deletes and moves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared column type. Changes how the grid view renders and edits cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Numeric,
    Hidden,
    Dropdown,
    Autocomplete,
    Checkbox,
    Radio,
    Calendar,
    Image,
    Color,
    Html,
}

impl ColumnType {
    pub const ALL: [ColumnType; 11] = [
        ColumnType::Text,
        ColumnType::Numeric,
        ColumnType::Hidden,
        ColumnType::Dropdown,
        ColumnType::Autocomplete,
        ColumnType::Checkbox,
        ColumnType::Radio,
        ColumnType::Calendar,
        ColumnType::Image,
        ColumnType::Color,
        ColumnType::Html,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Numeric => "numeric",
            ColumnType::Hidden => "hidden",
            ColumnType::Dropdown => "dropdown",
            ColumnType::Autocomplete => "autocomplete",
            ColumnType::Checkbox => "checkbox",
            ColumnType::Radio => "radio",
            ColumnType::Calendar => "calendar",
            ColumnType::Image => "image",
            ColumnType::Color => "color",
            ColumnType::Html => "html",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Descriptor for one column of the grid view
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ColumnDescriptor {
    /// Header label; only set while header promotion is active
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: ColumnType,
}

/// Error for column operations addressed past the last column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    OutOfRange { index: usize, count: usize },
}

impl fmt::Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnError::OutOfRange { index, count } => {
                write!(f, "column {} out of range ({} columns)", index, count)
            }
        }
    }
}

impl std::error::Error for ColumnError {}

/// Column types and header titles
#[derive(Debug, Clone, Default)]
pub struct ColumnModel {
    types: Vec<ColumnType>,
    titles: Vec<Option<String>>,
}

impl ColumnModel {
    /// Model for `count` text columns without titles
    pub fn new(count: usize) -> Self {
        Self {
            types: vec![ColumnType::Text; count],
            titles: vec![None; count],
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Descriptors for `count` columns.
    ///
    /// Entries beyond the stored state default to an untitled text column.
    pub fn columns(&self, count: usize) -> Vec<ColumnDescriptor> {
        (0..count)
            .map(|i| ColumnDescriptor {
                title: self.titles.get(i).cloned().flatten(),
                kind: self.types.get(i).copied().unwrap_or_default(),
            })
            .collect()
    }

    pub fn column_type(&self, index: usize) -> ColumnType {
        self.types.get(index).copied().unwrap_or_default()
    }

    /// Change the declared type of one column
    pub fn set_column_type(&mut self, index: usize, kind: ColumnType) -> Result<(), ColumnError> {
        let count = self.types.len();
        let slot = self
            .types
            .get_mut(index)
            .ok_or(ColumnError::OutOfRange { index, count })?;
        *slot = kind;
        Ok(())
    }

    /// Match the model to a grid's column count, appending or dropping at the end
    pub fn resize(&mut self, count: usize) {
        self.types.resize(count, ColumnType::Text);
        self.titles.resize(count, None);
    }

    /// Insert `n` text columns before `at`
    pub fn insert_columns(&mut self, at: usize, n: usize) {
        let at = at.min(self.types.len());
        self.types
            .splice(at..at, std::iter::repeat(ColumnType::Text).take(n));
        self.titles.splice(at..at, std::iter::repeat(None).take(n));
    }

    /// Remove up to `n` columns starting at `at`
    pub fn delete_columns(&mut self, at: usize, n: usize) {
        if at >= self.types.len() {
            return;
        }
        let end = (at + n).min(self.types.len());
        self.types.drain(at..end);
        self.titles.drain(at..end);
    }

    pub fn move_column(&mut self, from: usize, to: usize) {
        if from >= self.types.len() || to >= self.types.len() {
            return;
        }
        let kind = self.types.remove(from);
        self.types.insert(to, kind);
        let title = self.titles.remove(from);
        self.titles.insert(to, title);
    }

    /// Set header titles, growing the model if there are more titles than columns
    pub fn set_titles(&mut self, titles: Vec<String>) {
        if titles.len() > self.types.len() {
            self.resize(titles.len());
        }
        for (slot, title) in self.titles.iter_mut().zip(titles) {
            *slot = Some(title);
        }
    }

    /// Take the titles out of the model, leaving every column untitled
    pub fn clear_titles(&mut self) -> Vec<Option<String>> {
        let count = self.titles.len();
        std::mem::replace(&mut self.titles, vec![None; count])
    }

    pub fn titles(&self) -> &[Option<String>] {
        &self.titles
    }

    pub fn has_titles(&self) -> bool {
        self.titles.iter().any(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_default_to_text() {
        let model = ColumnModel::new(2);
        let columns = model.columns(3);

        assert_eq!(columns.len(), 3);
        assert!(columns
            .iter()
            .all(|c| c.kind == ColumnType::Text && c.title.is_none()));
    }

    #[test]
    fn test_set_column_type() {
        let mut model = ColumnModel::new(3);
        model.set_column_type(1, ColumnType::Numeric).unwrap();

        assert_eq!(model.columns(3)[1].kind, ColumnType::Numeric);
        assert_eq!(
            model.set_column_type(3, ColumnType::Checkbox),
            Err(ColumnError::OutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn test_insert_and_delete_keep_alignment() {
        let mut model = ColumnModel::new(3);
        model.set_column_type(0, ColumnType::Numeric).unwrap();
        model.set_column_type(2, ColumnType::Color).unwrap();

        model.insert_columns(1, 1);
        let kinds: Vec<ColumnType> = model.columns(4).iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnType::Numeric,
                ColumnType::Text,
                ColumnType::Text,
                ColumnType::Color
            ]
        );

        model.delete_columns(0, 2);
        let kinds: Vec<ColumnType> = model.columns(2).iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ColumnType::Text, ColumnType::Color]);
    }

    #[test]
    fn test_move_column() {
        let mut model = ColumnModel::new(2);
        model.set_titles(vec!["a".into(), "b".into()]);
        model.set_column_type(0, ColumnType::Html).unwrap();
        model.move_column(0, 1);

        let columns = model.columns(2);
        assert_eq!(columns[1].title.as_deref(), Some("a"));
        assert_eq!(columns[1].kind, ColumnType::Html);
    }

    #[test]
    fn test_titles_round_trip() {
        let mut model = ColumnModel::new(2);
        model.set_titles(vec!["x".into(), "y".into()]);
        assert!(model.has_titles());

        let titles = model.clear_titles();
        assert_eq!(titles, vec![Some("x".to_string()), Some("y".to_string())]);
        assert!(!model.has_titles());
    }

    #[test]
    fn test_column_type_names() {
        for kind in ColumnType::ALL {
            assert_eq!(ColumnType::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ColumnType::from_name("formula"), None);
    }
}
