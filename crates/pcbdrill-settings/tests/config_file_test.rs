use pcbdrill_settings::{Config, SettingsError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_toml_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::new();
    config.milling.bit_diameter_mm = 0.8;
    config.milling.use_arcs = true;
    config.outline.bit_diameter_mm = Some(2.0);
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::new();
    config.program.dwell_seconds = 0.5;
    config.save_to_file(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"dwell_seconds\": 0.5"));
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_unknown_extension_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "milling: {}").unwrap();

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));
    assert!(Config::new().save_to_file(&path).is_err());
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[milling]\nbit_diameter_mm = -1.0\n").unwrap();

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::Parameter(_))
    ));
}

#[test]
fn test_malformed_toml_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[milling\n").unwrap();

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::IoError(_))
    ));
}
