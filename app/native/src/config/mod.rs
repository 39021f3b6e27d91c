//! Configuration module for Homescreen.
//!
//! Provides configuration types and loading. The configuration is loaded once
//! at startup and passed by reference to the components that need it; nothing
//! in the core reads configuration from global state.
//!
//! The configuration file supports JSONC format (JSON with comments).

pub mod types;

use std::path::{Path, PathBuf};

pub use types::{
    ClockConfig, ConfigError, DateFormat, DeviceConfig, ExpectedFormat, HomescreenConfig,
    HostConfig, NotificationConfig, WallpaperConfig, WallpaperNaming, config_paths,
    default_data_dir, load_config as load_config_default, load_config_from_path,
};

/// A loaded configuration together with the file it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The parsed configuration (defaults if no file was found).
    pub config: HomescreenConfig,
    /// Path of the configuration file, if one was loaded.
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Directory used to resolve relative paths in the configuration.
    ///
    /// This is the config file's directory, or the current directory when
    /// running on defaults.
    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }
}

/// Loads the configuration.
///
/// With a `custom_path` (from `--config`), the file must exist and parse.
/// Otherwise the default search paths are tried; a missing file yields the
/// default configuration and a broken one is logged and replaced by defaults.
///
/// # Errors
///
/// Returns an error only when an explicitly requested file is missing or invalid.
pub fn load(custom_path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = custom_path {
        let (config, path) = load_config_from_path(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        return Ok(LoadedConfig { config, path: Some(path) });
    }

    match load_config_default() {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            Ok(LoadedConfig { config, path: Some(path) })
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            Ok(LoadedConfig::default())
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            Ok(LoadedConfig::default())
        }
    }
}
