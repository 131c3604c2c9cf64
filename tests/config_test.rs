//! Integration tests for Settings layered loading.
//!
//! These tests pass config files explicitly (temp directories only), so a
//! global config on the host does not influence them.

use std::fs;

use tempfile::TempDir;

use hierarchy::application::ApplicationError;
use hierarchy::config::Settings;
use hierarchy::domain::DEFAULT_MAX_HOPS;

#[test]
fn given_no_files_when_loading_layers_then_defaults() {
    let settings = Settings::load_layers(None, None).expect("load settings");

    assert_eq!(settings.max_hops, DEFAULT_MAX_HOPS);
    assert!(settings.reject_duplicate_codes);
}

#[test]
fn given_global_and_explicit_when_loading_then_explicit_wins() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("global.toml");
    let explicit = dir.path().join("explicit.toml");
    fs::write(&global, "max_hops = 20\nreject_duplicate_codes = false\n").unwrap();
    fs::write(&explicit, "max_hops = 5\n").unwrap();

    // Act
    let settings = Settings::load_layers(Some(&global), Some(&explicit)).unwrap();

    // Assert
    assert_eq!(settings.max_hops, 5);
    assert!(!settings.reject_duplicate_codes, "global value kept");
}

#[test]
fn given_missing_global_when_loading_then_skipped() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load_layers(Some(&dir.path().join("absent.toml")), None).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_missing_explicit_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load_layers(None, Some(&dir.path().join("absent.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_zero_ceiling_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("bad.toml");
    fs::write(&explicit, "max_hops = 0\n").unwrap();

    let result = Settings::load_layers(None, Some(&explicit));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_settings_when_rendering_toml_then_round_trips_values() {
    let settings = Settings {
        max_hops: 42,
        reject_duplicate_codes: false,
    };

    let rendered = settings.to_toml().unwrap();

    assert!(rendered.contains("max_hops = 42"));
    assert!(rendered.contains("reject_duplicate_codes = false"));
}
