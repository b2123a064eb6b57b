//! Header row promotion and demotion
//!
//! Promoting moves the first data row into column titles; demoting puts the
//! titles back as row 0. The two are inverse operations on cell contents.

use super::model::{CellValue, Grid};

/// Convert column index to letter(s): 0->A, 1->B, ..., 25->Z, 26->AA, etc.
pub fn column_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Remove the first row and return its values as titles.
///
/// Returns `None` (and leaves the grid untouched) when there is no row to promote.
pub fn promote_header(grid: &mut Grid) -> Option<Vec<String>> {
    let row = grid.take_first_row()?;
    Some(row.iter().map(|v| v.to_string()).collect())
}

/// Insert titles back as the first data row
pub fn demote_header(grid: &mut Grid, titles: &[Option<String>]) {
    grid.insert_row_values(0, header_row(titles, grid.column_count().max(titles.len())));
}

/// Build a header row for serialization.
///
/// Columns without a title (e.g. inserted after promotion) get their
/// default letter label.
pub fn header_row(titles: &[Option<String>], column_count: usize) -> Vec<CellValue> {
    (0..column_count)
        .map(|col| match titles.get(col) {
            Some(Some(title)) => CellValue::from(title.as_str()),
            _ => CellValue::Text(column_to_letters(col)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(0), "A");
        assert_eq!(column_to_letters(1), "B");
        assert_eq!(column_to_letters(25), "Z");
        assert_eq!(column_to_letters(26), "AA");
        assert_eq!(column_to_letters(27), "AB");
        assert_eq!(column_to_letters(51), "AZ");
        assert_eq!(column_to_letters(52), "BA");
    }

    #[test]
    fn test_promote_then_demote_is_identity() {
        let original = Grid::from_strings(vec![vec!["a", "b"], vec!["1", "2"], vec!["3", "4"]]);
        let mut grid = original.clone();

        let titles = promote_header(&mut grid).unwrap();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(grid, Grid::from_strings(vec![vec!["1", "2"], vec!["3", "4"]]));

        let titles: Vec<Option<String>> = titles.into_iter().map(Some).collect();
        demote_header(&mut grid, &titles);
        assert_eq!(grid, original);
    }

    #[test]
    fn test_promote_empty_grid() {
        let mut grid = Grid::new();
        assert_eq!(promote_header(&mut grid), None);
    }

    #[test]
    fn test_header_row_fills_missing_titles() {
        let titles = vec![Some("id".to_string()), None];
        let row = header_row(&titles, 3);
        let labels: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        assert_eq!(labels, vec!["id", "B", "C"]);
    }
}
