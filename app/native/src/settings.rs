//! Durable settings capability.
//!
//! The core never owns global settings; the host injects a [`Settings`]
//! implementation at construction. The only durable value the core needs is
//! the selected wallpaper name, stored under
//! [`WALLPAPER_SETTING_KEY`](crate::constants::WALLPAPER_SETTING_KEY).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised while persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The settings could not be encoded.
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value settings injected by the host.
pub trait Settings: Send + Sync {
    /// Returns the value stored under `key`, or `default` when absent.
    fn get(&self, key: &str, default: Value) -> Value;

    /// Stores `value` under `key`, persisting it if the store is durable.
    ///
    /// # Errors
    ///
    /// Returns an error if a durable store fails to write.
    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError>;

    /// Returns the string stored under `key`, if it is a string.
    fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key, Value::Null) {
            Value::String(value) => Some(value),
            _ => None,
        }
    }
}

/// In-memory settings that do not survive the process.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<Map<String, Value>>,
}

impl MemorySettings {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl Settings for MemorySettings {
    fn get(&self, key: &str, default: Value) -> Value {
        self.values.lock().get(key).cloned().unwrap_or(default)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// Settings stored as a JSON object in a file.
///
/// Every `set` rewrites the whole file through a temporary file in the same
/// directory, so a crash never leaves a truncated settings file behind.
#[derive(Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileSettings {
    /// Opens the settings file, starting empty if it is missing or unreadable.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        let values = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(values) => values,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "settings file is not a JSON object, starting empty"
                    );
                    Map::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read settings");
                Map::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn write(&self, values: &Map<String, Value>) -> Result<(), SettingsError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|err| self.io_error(err))?;

        let encoded = serde_json::to_vec_pretty(values)?;
        let mut file = NamedTempFile::new_in(dir).map_err(|err| self.io_error(err))?;
        file.write_all(&encoded).map_err(|err| self.io_error(err))?;
        file.persist(&self.path).map_err(|err| self.io_error(err.error))?;
        Ok(())
    }
}

impl Settings for JsonFileSettings {
    fn get(&self, key: &str, default: Value) -> Value {
        self.values.lock().get(key).cloned().unwrap_or(default)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut values = self.values.lock();
        if values.get(key) == Some(&value) {
            return Ok(());
        }

        // Only what reached disk becomes visible to `get`.
        let mut updated = values.clone();
        updated.insert(key.to_string(), value);
        self.write(&updated)?;
        *values = updated;
        Ok(())
    }
}
