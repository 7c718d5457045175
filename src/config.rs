//! Persisted user settings.
//!
//! A small JSON document remembered between runs:
//!
//! ```json
//! { "music_filter": false, "recursive_scan": true, "last_directory": "/home/me/Music" }
//! ```
//!
//! It lives at `<config_dir>/disktider/settings.json` as resolved by
//! `directories`. A missing or malformed file yields the defaults; nothing
//! here ever aborts a scan.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name inside the platform config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Errors from reading or writing the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No config directory could be determined for this user.
    #[error("Failed to determine the configuration directory")]
    NoConfigDir,

    /// The file could not be read or written.
    #[error("Settings I/O error for {path}: {source}")]
    Io {
        /// Settings file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid settings JSON.
    #[error("Malformed settings file {path}: {source}")]
    Parse {
        /// Settings file path
        path: PathBuf,
        /// The JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// User settings remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Restrict scans to the music extension preset.
    pub music_filter: bool,
    /// Descend into subdirectories.
    pub recursive_scan: bool,
    /// Directory scanned last time.
    pub last_directory: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_filter: false,
            recursive_scan: true,
            last_directory: None,
        }
    }
}

impl Settings {
    /// Load from the default platform-specific path, falling back to defaults.
    #[must_use]
    pub fn load() -> Self {
        match Self::settings_path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                log::debug!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load from an explicit path. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// `Io` if the file exists but cannot be read, `Parse` if it is malformed.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save to the default platform-specific path.
    ///
    /// # Errors
    ///
    /// `NoConfigDir` or `Io`.
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::settings_path()?)
    }

    /// Save to an explicit path, creating parent directories.
    ///
    /// # Errors
    ///
    /// `Io` if the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_error = |source: std::io::Error| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_error)
    }

    /// Default platform-specific settings path.
    ///
    /// # Errors
    ///
    /// `NoConfigDir` when the platform has no home directory.
    pub fn settings_path() -> Result<PathBuf, SettingsError> {
        let dirs = ProjectDirs::from("", "", "disktider").ok_or(SettingsError::NoConfigDir)?;
        Ok(dirs.config_dir().join(SETTINGS_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.music_filter);
        assert!(settings.recursive_scan);
        assert!(settings.last_directory.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{"music_filter": true}"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(settings.music_filter);
        assert!(settings.recursive_scan);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_save_creates_parent_and_writes_expected_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = Settings {
            music_filter: true,
            recursive_scan: false,
            last_directory: Some(PathBuf::from("/music")),
        };

        settings.save_to(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["music_filter"], true);
        assert_eq!(raw["recursive_scan"], false);
        assert_eq!(raw["last_directory"], "/music");
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }
}
