use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::modules::hidden_tabs::ALL_TABS_VISIBLE;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub home_path: String,
    /// Views under these prefixes (login, access denied, ...) are never retained.
    pub auth_prefixes: Vec<String>,
    pub all_tabs_visible_label: String,
    pub log_level: String, // "error", "warn", "info", "debug", "trace"
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            home_path: "/".to_string(),
            auth_prefixes: vec!["/auth".to_string()],
            all_tabs_visible_label: ALL_TABS_VISIBLE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join("admin-tabs").join("settings.json"))
            .ok_or(SettingsError::NoConfigDir)
    }

    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    log::warn!("[Settings] Failed to parse settings: {}, returning defaults", e);
                    Self::default()
                }),
                Err(e) => {
                    log::warn!("[Settings] Failed to read file: {}, returning defaults", e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Like `load`, but writes the defaults out when no file exists yet so
    /// there is something to edit.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::load(path);
        }
        let settings = Self::default();
        if let Err(e) = settings.save(path) {
            log::warn!("[Settings] Failed to write defaults to {}: {}", path.display(), e);
        }
        settings
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let tmp_path = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to tmp, then rename, so a crash never leaves a half-written file.
        fs::write(&tmp_path, json)?;
        fs::rename(tmp_path, path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(Settings::load(&dir.path().join("nope.json")), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            home_path: "/dashboard".to_string(),
            auth_prefixes: vec!["/auth".to_string(), "/sso".to_string()],
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"log_level":"debug"}"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.home_path, "/");
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("admin-tabs").join("settings.json");

        assert_eq!(Settings::load_or_init(&path), Settings::default());
        assert!(path.exists());

        fs::write(&path, r#"{"home_path":"/dashboard"}"#).unwrap();
        assert_eq!(Settings::load_or_init(&path).home_path, "/dashboard");
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }
}
