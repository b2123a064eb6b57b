//! Configuration system tests
//!
//! Tests for config paths and sheet config defaults and serialization.

use csvgrid::config_paths;
use csvgrid::layout::FitMode;
use csvgrid::SheetConfig;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("csvgrid"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(&config));
    }
}

// ========================================================================
// Sheet Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = SheetConfig::default();
    assert_eq!(config.default_column_width, 50.0);
    assert_eq!(config.min_column_width, 25.0);
    assert_eq!(config.fit_cells_threshold, 10_000);
    assert_eq!(config.backlight_window, 1000);
    assert_eq!(config.scroll_margin, 3.0);
    assert!(!config.header_row);
}

#[test]
fn test_config_serialize_deserialize() {
    let config = SheetConfig {
        header_row: true,
        backlight_window: 200,
        ..SheetConfig::default()
    };
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: SheetConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_config_builds_engines() {
    let config = SheetConfig {
        fit_cells_threshold: 10,
        gutter_width: 20.0,
        ..SheetConfig::default()
    };

    let mut layout = config.layout_engine();
    assert_eq!(layout.choose_initial_mode(2, 4), FitMode::FitCells);
    assert_eq!(layout.choose_initial_mode(2, 5), FitMode::AllEqualDefault);

    assert_eq!(config.grid_metrics().gutter_width, 20.0);
    assert!(!config.search_provider().is_active());
}
