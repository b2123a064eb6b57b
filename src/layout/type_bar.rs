//! Column type bar geometry
//!
//! The bar above the grid shows one type selector per column and has to stay
//! aligned with the grid's columns, so it mirrors the view's widths.

use crate::grid::GridView;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTypeBar {
    gutter: f32,
    widths: Vec<f32>,
}

impl ColumnTypeBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the gutter and column widths from the view
    pub fn remeasure(&mut self, view: &dyn GridView) {
        self.gutter = view.gutter_width();
        self.widths = view.column_widths();
    }

    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    pub fn width(&self, col: usize) -> Option<f32> {
        self.widths.get(col).copied()
    }

    /// Left edge of every selector, starting after the gutter
    pub fn offsets(&self) -> Vec<f32> {
        self.widths
            .iter()
            .scan(self.gutter, |x, w| {
                let left = *x;
                *x += w;
                Some(left)
            })
            .collect()
    }

    pub fn total_width(&self) -> f32 {
        self.gutter + self.widths.iter().sum::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::Grid;
    use crate::grid::MemoryGrid;

    #[test]
    fn test_follows_user_resize() {
        let mut view = MemoryGrid::with_data(Grid::from_strings(vec![vec!["a", "b", "c"]]));
        let mut bar = ColumnTypeBar::new();
        bar.remeasure(&view);
        assert_eq!(bar.offsets(), vec![50.0, 100.0, 150.0]);

        view.resize_column(1, 80.0);
        bar.remeasure(&view);
        assert_eq!(bar.width(1), Some(80.0));
        assert_eq!(bar.offsets(), vec![50.0, 100.0, 180.0]);
        assert_eq!(bar.total_width(), 230.0);
    }
}
