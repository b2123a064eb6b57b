//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the host should perform after an update.

/// High-level UI regions that can be independently redrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageArea {
    /// Cells, row index and column headers
    Grid,
    /// Column type selector strip above the grid
    TypeBar,
    /// Selection span and match counter
    StatusBar,
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a partial redraw of specific areas
    RedrawAreas(Vec<DamageArea>),
    /// Search results changed (count or current match)
    SearchChanged { matches: usize, current: usize },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::RedrawAreas(areas) => !areas.is_empty(),
            Cmd::SearchChanged { .. } => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Redraw the grid and status bar
    pub fn redraw_grid() -> Self {
        Cmd::RedrawAreas(vec![DamageArea::Grid, DamageArea::StatusBar])
    }

    /// Redraw the grid together with the column type bar (widths changed)
    pub fn redraw_layout() -> Self {
        Cmd::RedrawAreas(vec![
            DamageArea::Grid,
            DamageArea::TypeBar,
            DamageArea::StatusBar,
        ])
    }

    /// Create a command to redraw just the status bar
    pub fn redraw_status_bar() -> Self {
        Cmd::RedrawAreas(vec![DamageArea::StatusBar])
    }
}

// Allow converting Option<Cmd> to Cmd
impl From<Option<Cmd>> for Cmd {
    fn from(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_redraw() {
        assert!(!Cmd::None.needs_redraw());
        assert!(Cmd::redraw_grid().needs_redraw());
        assert!(!Cmd::RedrawAreas(vec![]).needs_redraw());
        assert!(Cmd::batch(vec![Cmd::None, Cmd::redraw_status_bar()]).needs_redraw());
        assert_eq!(Cmd::from(None), Cmd::None);
    }
}
