//! Scroll viewport calculations
//!
//! Tracks which portion of the grid content is visible, in pixels.

/// A rectangle in content coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Whether `other` lies completely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.right() <= self.right()
            && other.y >= self.y
            && other.bottom() <= self.bottom()
    }
}

/// New scroll offsets that bring `cell` into `viewport`, keeping `margin`
/// pixels between the cell and the viewport edge.
///
/// Returns `None` when the cell is already fully visible, so repeated
/// navigation inside one screen does not move the view.
pub fn scroll_into_view(viewport: Rect, cell: Rect, margin: f32) -> Option<(f32, f32)> {
    if viewport.contains_rect(&cell) {
        return None;
    }

    let mut left = viewport.x;
    if cell.x < viewport.x {
        left = cell.x - margin;
    } else if cell.right() > viewport.right() {
        // Wider than the viewport: align the left edge instead
        left = if cell.width + margin > viewport.width {
            cell.x - margin
        } else {
            cell.right() + margin - viewport.width
        };
    }

    let mut top = viewport.y;
    if cell.y < viewport.y {
        top = cell.y - margin;
    } else if cell.bottom() > viewport.bottom() {
        top = if cell.height + margin > viewport.height {
            cell.y - margin
        } else {
            cell.bottom() + margin - viewport.height
        };
    }

    Some((left.max(0.0), top.max(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_cell_does_not_scroll() {
        let vp = Rect::new(0.0, 0.0, 300.0, 200.0);
        let cell = Rect::new(50.0, 24.0, 50.0, 24.0);
        assert_eq!(scroll_into_view(vp, cell, 3.0), None);
    }

    #[test]
    fn test_scroll_down_with_margin() {
        let vp = Rect::new(0.0, 0.0, 300.0, 200.0);
        let cell = Rect::new(0.0, 240.0, 50.0, 24.0);
        assert_eq!(scroll_into_view(vp, cell, 3.0), Some((0.0, 67.0)));
    }

    #[test]
    fn test_scroll_up_and_left() {
        let vp = Rect::new(400.0, 500.0, 300.0, 200.0);
        let cell = Rect::new(100.0, 120.0, 50.0, 24.0);
        assert_eq!(scroll_into_view(vp, cell, 3.0), Some((97.0, 117.0)));
    }

    #[test]
    fn test_partially_visible_cell_scrolls() {
        let vp = Rect::new(0.0, 0.0, 300.0, 200.0);
        let cell = Rect::new(280.0, 0.0, 50.0, 24.0);
        assert_eq!(scroll_into_view(vp, cell, 3.0), Some((33.0, 0.0)));
    }

    #[test]
    fn test_offsets_clamped_at_zero() {
        let vp = Rect::new(10.0, 10.0, 300.0, 200.0);
        let cell = Rect::new(0.0, 0.0, 50.0, 24.0);
        assert_eq!(scroll_into_view(vp, cell, 3.0), Some((0.0, 0.0)));
    }
}
