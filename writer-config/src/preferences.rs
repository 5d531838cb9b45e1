//! Display preferences owned by the UI shell.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{ConfigError, ConfigResult};

/// Storage key under which the dark mode flag is persisted.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Preferences the UI shell restores at startup and writes back on change.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DisplayPreferences {
    /// Whether the dark theme is active.
    #[serde(rename = "darkMode")]
    pub dark_mode: bool,
}

impl DisplayPreferences {
    /// Returns a copy with dark mode flipped.
    #[must_use]
    pub const fn toggled(self) -> Self {
        Self {
            dark_mode: !self.dark_mode,
        }
    }
}

/// Durable storage for [`DisplayPreferences`].
pub trait PreferenceStore: Send + Sync {
    /// Loads stored preferences, falling back to defaults when none exist.
    ///
    /// # Errors
    ///
    /// Returns an error when stored data exists but cannot be read.
    fn load(&self) -> ConfigResult<DisplayPreferences>;

    /// Persists the supplied preferences.
    ///
    /// # Errors
    ///
    /// Returns an error when existing stored data cannot be read or the data
    /// cannot be written.
    fn save(&self, preferences: DisplayPreferences) -> ConfigResult<()>;
}

/// JSON file store. Unrelated keys already in the file are preserved.
#[derive(Clone, Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Creates a store backed by the supplied file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> ConfigResult<Option<Map<String, Value>>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::PreferenceIo {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| ConfigError::PreferenceFormat {
                path: self.path.clone(),
                source,
            })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> ConfigResult<DisplayPreferences> {
        let Some(map) = self.read_map()? else {
            debug!(path = %self.path.display(), "no stored preferences; using defaults");
            return Ok(DisplayPreferences::default());
        };

        let dark_mode = match map.get(DARK_MODE_KEY) {
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                warn!(path = %self.path.display(), value = %other, "ignoring non-boolean dark mode value");
                false
            }
            None => false,
        };
        Ok(DisplayPreferences { dark_mode })
    }

    fn save(&self, preferences: DisplayPreferences) -> ConfigResult<()> {
        let io_error = |source| ConfigError::PreferenceIo {
            path: self.path.clone(),
            source,
        };

        let mut map = self.read_map()?.unwrap_or_default();
        map.insert(DARK_MODE_KEY.to_owned(), Value::Bool(preferences.dark_mode));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let contents = serde_json::to_string_pretty(&Value::Object(map)).map_err(|source| {
            ConfigError::PreferenceFormat {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, contents).map_err(io_error)?;

        debug!(path = %self.path.display(), dark_mode = preferences.dark_mode, "saved preferences");
        Ok(())
    }
}

/// In-memory store, for shells without durable storage and for tests.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<Option<DisplayPreferences>>,
}

impl MemoryPreferenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> ConfigResult<DisplayPreferences> {
        let guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(guard.unwrap_or_default())
    }

    fn save(&self, preferences: DisplayPreferences) -> ConfigResult<()> {
        let mut guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = Some(preferences);
        Ok(())
    }
}
