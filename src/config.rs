// SPDX-License-Identifier: GPL-3.0-or-later
// src/config.rs
//
// Application configuration and the persisted theme preference.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constant::{
    APP_DIR, ARCHIVE_NAME, DOWNLOAD_RELEASE_DELAY_MS, EXPORT_PREFIX, SETTINGS_FILE, THEME_ENV,
    THEME_KEY,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no platform config directory")]
    NoConfigDir,
}

// =============================================================================
// Theme
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Persisted preference, else `TIKCROP_THEME`, else the configured default.
    pub fn resolve(store: &dyn SettingsStore, config: &AppConfig) -> Self {
        match store.get(THEME_KEY) {
            Ok(Some(value)) => match value.parse() {
                Ok(theme) => return theme,
                Err(()) => log::warn!("Ignoring unknown persisted theme {value:?}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read theme preference: {e}"),
        }

        std::env::var(THEME_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(config.theme)
    }

    pub fn persist(self, store: &dyn SettingsStore) -> Result<(), ConfigError> {
        store.set(THEME_KEY, self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// App config
// =============================================================================

/// Global configuration for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Theme used when nothing is persisted or set in the environment.
    pub theme: Theme,
    /// Prefix of exported file names.
    pub export_prefix: String,
    /// File name of the batch archive.
    pub archive_name: String,
    /// How long a delivered download stays alive before its handle is released.
    pub download_release_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            export_prefix: EXPORT_PREFIX.to_string(),
            archive_name: ARCHIVE_NAME.to_string(),
            download_release_delay: Duration::from_millis(DOWNLOAD_RELEASE_DELAY_MS),
        }
    }
}

// =============================================================================
// Settings stores
// =============================================================================

/// Key-value client store that survives sessions.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object of string values stored in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform config directory, e.g. `~/.config/tikcrop/settings.json`.
    pub fn in_config_dir() -> Result<Self, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dir.join(APP_DIR).join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" Light ".parse::<Theme>(), Ok(Theme::Light));
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }

    #[test]
    fn test_persisted_theme_wins() {
        let store = MemoryStore::default();
        Theme::Dark.persist(&store).unwrap();
        assert_eq!(Theme::resolve(&store, &AppConfig::default()), Theme::Dark);
    }

    #[test]
    fn test_unknown_persisted_value_falls_back() {
        let store = MemoryStore::default();
        store.set(THEME_KEY, "sepia").unwrap();
        let config = AppConfig {
            theme: Theme::Dark,
            ..AppConfig::default()
        };
        // Only meaningful when the override variable is not set in the test environment.
        if std::env::var(THEME_ENV).is_err() {
            assert_eq!(Theme::resolve(&store, &config), Theme::Dark);
        }
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("settings.json"));
        assert_eq!(store.get(THEME_KEY).unwrap(), None);

        store.set(THEME_KEY, "dark").unwrap();
        store.set("other", "value").unwrap();

        let reopened = JsonFileStore::new(store.path());
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.get(THEME_KEY), Err(ConfigError::Json(_))));
    }
}
