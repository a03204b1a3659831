use enclosure_settings::{Settings, SettingsError};
use tempfile::TempDir;

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("settings.toml");

    let mut settings = Settings::default();
    settings.parameters.wall.thickness = 4.0;
    settings.parameters.drives.count = 3;
    settings.output.nest = true;
    settings.save_to_file(&path).unwrap();

    let loaded = Settings::load_from_file(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let mut settings = Settings::default();
    settings.output.dxf = true;
    settings.save_to_file(&path).unwrap();

    let loaded = Settings::load_from_file(&path).unwrap();
    assert!(loaded.output.dxf);
    assert_eq!(loaded, settings);
}

#[test]
fn test_invalid_parameters_are_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");

    let mut settings = Settings::default();
    settings.parameters.wall.thickness = -1.0;
    assert!(matches!(
        settings.save_to_file(&path),
        Err(SettingsError::Invalid(_))
    ));
    assert!(!path.exists());
}

#[test]
fn test_invalid_file_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[parameters.drives]\ncount = 0\n").unwrap();
    assert!(matches!(
        Settings::load_from_file(&path),
        Err(SettingsError::Invalid(_))
    ));
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_malformed_toml_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[parameters.wall\nthickness = ").unwrap();
    assert!(matches!(
        Settings::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}
