//! Sheet configuration persistence
//!
//! Stores user preferences in `~/.config/csvgrid/config.yaml`. Every field is
//! optional in the file; missing ones take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::GridMetrics;
use crate::layout::{LayoutEngine, FIT_CELLS_THRESHOLD, MIN_COLUMN_WIDTH};
use crate::search::{SearchProvider, BACKLIGHT_WINDOW, SCROLL_MARGIN};

/// Sheet editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Width of a column under the all-equal-default fit mode
    pub default_column_width: f32,
    /// Narrowest column the fit-cells mode produces
    pub min_column_width: f32,
    /// Grids with fewer cells than this open in fit-cells mode
    pub fit_cells_threshold: usize,
    /// Number of search matches highlighted around the current one
    pub backlight_window: usize,
    /// Pixels kept between a revealed match and the viewport edge
    pub scroll_margin: f32,
    pub char_width: f32,
    pub cell_padding: f32,
    pub row_height: f32,
    /// Width of the row-index gutter
    pub gutter_width: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Treat the first row as column titles when a file is opened
    pub header_row: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        let metrics = GridMetrics::default();
        Self {
            default_column_width: 50.0,
            min_column_width: MIN_COLUMN_WIDTH,
            fit_cells_threshold: FIT_CELLS_THRESHOLD,
            backlight_window: BACKLIGHT_WINDOW,
            scroll_margin: SCROLL_MARGIN,
            char_width: metrics.char_width,
            cell_padding: metrics.cell_padding,
            row_height: metrics.row_height,
            gutter_width: metrics.gutter_width,
            viewport_width: 800.0,
            viewport_height: 600.0,
            header_row: false,
        }
    }
}

impl SheetConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn grid_metrics(&self) -> GridMetrics {
        GridMetrics {
            char_width: self.char_width,
            cell_padding: self.cell_padding,
            row_height: self.row_height,
            header_height: self.row_height,
            gutter_width: self.gutter_width,
        }
    }

    pub fn layout_engine(&self) -> LayoutEngine {
        LayoutEngine::new(self.min_column_width, self.fit_cells_threshold)
    }

    pub fn search_provider(&self) -> SearchProvider {
        SearchProvider::new(self.backlight_window, self.scroll_margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "default_column_width: 80\nheader_row: true\n").unwrap();

        let config = SheetConfig::load_from(&path);
        assert_eq!(config.default_column_width, 80.0);
        assert!(config.header_row);
        assert_eq!(config.fit_cells_threshold, 10_000);
        assert_eq!(config.backlight_window, 1000);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "default_column_width: [not, a, number]\n").unwrap();

        assert_eq!(SheetConfig::load_from(&path), SheetConfig::default());
        assert_eq!(
            SheetConfig::load_from(&dir.path().join("missing.yaml")),
            SheetConfig::default()
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = SheetConfig {
            scroll_margin: 6.0,
            ..SheetConfig::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(SheetConfig::load_from(&path), config);
    }
}
