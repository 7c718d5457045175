use disktider::config::{Settings, SettingsError, SETTINGS_FILE};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_settings_round_trip_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("disktider").join(SETTINGS_FILE);

    let settings = Settings {
        music_filter: true,
        recursive_scan: false,
        last_directory: Some(PathBuf::from("/home/me/Music")),
    };
    settings.save_to(&path).unwrap();

    assert_eq!(Settings::load_from(&path).unwrap(), settings);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(
        &path,
        r#"{"music_filter": true, "window_geometry": [0, 0, 800, 600]}"#,
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert!(settings.music_filter);
    assert!(settings.recursive_scan);
    assert!(settings.last_directory.is_none());
}

#[test]
fn test_wrong_types_are_parse_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(&path, r#"{"recursive_scan": "yes"}"#).unwrap();

    let err = Settings::load_from(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Parse { .. }));
    assert!(err.to_string().contains(SETTINGS_FILE));
}

#[test]
fn test_overwrite_replaces_previous_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);

    Settings {
        music_filter: true,
        ..Settings::default()
    }
    .save_to(&path)
    .unwrap();
    Settings::default().save_to(&path).unwrap();

    assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
}
