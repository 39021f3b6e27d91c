//! Configuration types for Homescreen.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{
    APP_ID, DEFAULT_SHOW_DELAY_MS, DEFAULT_WALLPAPER, DEFAULT_WEATHER_EVERY_TICKS,
};
use crate::platform::path::expand_and_resolve;

/// How a downloaded wallpaper is named in the user directory.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperNaming {
    /// `wallpaper-HHMMSS.<ext>` derived from the local time of day.
    #[default]
    Timestamped,
    /// A single `custom-wallpaper.<ext>` slot overwritten on every add.
    Reserved,
}

/// Image format a downloaded wallpaper must decode as.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedFormat {
    #[default]
    Jpeg,
    Png,
}

impl ExpectedFormat {
    /// File extension used when saving a wallpaper of this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// The matching `image` crate format.
    #[must_use]
    pub const fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

/// Wallpaper configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WallpaperConfig {
    /// Directory of built-in wallpapers shipped with the device.
    /// Relative paths resolve against the config file directory.
    pub skill_directory: String,

    /// Directory for user-added wallpapers. Created if missing.
    /// Empty means `<data dir>/homescreen/wallpapers`.
    pub user_directory: String,

    /// File name of the fallback wallpaper.
    pub default: String,

    /// Naming scheme for downloaded wallpapers: "timestamped" or "reserved".
    pub naming: WallpaperNaming,

    /// Format downloaded wallpapers must decode as: "jpeg" or "png".
    pub expected_format: ExpectedFormat,

    /// Rescan the collection when files change in the user directory.
    pub watch_user_directory: bool,
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            skill_directory: "ui/wallpapers".to_string(),
            user_directory: String::new(),
            default: DEFAULT_WALLPAPER.to_string(),
            naming: WallpaperNaming::default(),
            expected_format: ExpectedFormat::default(),
            watch_user_directory: false,
        }
    }
}

impl WallpaperConfig {
    /// Resolves the built-in wallpaper directory.
    #[must_use]
    pub fn skill_dir(&self, base_dir: &Path) -> PathBuf {
        expand_and_resolve(&self.skill_directory, base_dir)
    }

    /// Resolves the user wallpaper directory.
    #[must_use]
    pub fn user_dir(&self, base_dir: &Path) -> PathBuf {
        if self.user_directory.trim().is_empty() {
            return default_data_dir().join("wallpapers");
        }
        expand_and_resolve(&self.user_directory, base_dir)
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationConfig {
    /// Milliseconds between accepting a notification and showing it. 0 disables the pause.
    pub show_delay_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self { Self { show_delay_ms: DEFAULT_SHOW_DELAY_MS } }
}

/// Order of month and day in the device's date format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DateFormat {
    /// Month, day, year.
    #[default]
    Mdy,
    /// Day, month, year.
    Dmy,
}

/// Idle clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ClockConfig {
    /// "MDY" or "DMY".
    pub date_format: DateFormat,

    /// Show the time as `HH:MM` instead of `h:MM`.
    pub use_24_hour: bool,

    /// Number of clock ticks between weather and alarm refresh requests.
    pub weather_every_ticks: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            date_format: DateFormat::default(),
            use_24_hour: false,
            weather_every_ticks: DEFAULT_WEATHER_EVERY_TICKS,
        }
    }
}

/// Device information configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceConfig {
    /// Development devices show their build date on the idle screen.
    pub development_device: bool,

    /// JSON file with a `build_date` field.
    pub build_info_path: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            development_device: false,
            build_info_path: format!("/etc/{APP_ID}/build-info.json"),
        }
    }
}

/// Host integration configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct HostConfig {
    /// Capabilities advertised by the display host (e.g., `"wallpaper_path"`).
    pub capabilities: Vec<String>,
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct HomescreenConfig {
    /// Wallpaper collection settings.
    pub wallpapers: WallpaperConfig,

    /// Notification settings.
    pub notifications: NotificationConfig,

    /// Idle clock settings.
    pub clock: ClockConfig,

    /// Device settings.
    pub device: DeviceConfig,

    /// Display host settings.
    pub host: HostConfig,

    /// File persisting durable settings (the selected wallpaper).
    /// Empty means `<data dir>/homescreen/settings.json`.
    pub settings_path: String,
}

impl HomescreenConfig {
    /// Resolves the settings file path.
    #[must_use]
    pub fn settings_file(&self, base_dir: &Path) -> PathBuf {
        if self.settings_path.trim().is_empty() {
            return default_data_dir().join("settings.json");
        }
        expand_and_resolve(&self.settings_path, base_dir)
    }
}

/// Returns `<data dir>/homescreen`, or `/tmp/homescreen` if unavailable.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(format!("/tmp/{APP_ID}")), |dir| dir.join(APP_ID))
}

/// Errors that can occur when loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    NotFound,
    /// The configuration file exists but could not be read.
    IoError(std::io::Error),
    /// The configuration file contains invalid JSON.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Expected at ~/.config/homescreen/config.jsonc \
                or ~/.homescreen.jsonc"
            ),
            Self::IoError(err) => write!(f, "Failed to read configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Home-directory configuration file names.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".homescreen.jsonc", ".homescreen.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/homescreen/config.jsonc` or `config.json`
/// 2. `~/.config/homescreen/config.jsonc` or `config.json`
/// 3. The platform config directory (`dirs::config_dir()`)
/// 4. `~/.homescreen.jsonc` or `~/.homescreen.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let app_dir = PathBuf::from(xdg_config).join(APP_ID);
        for filename in CONFIG_FILE_NAMES {
            paths.push(app_dir.join(filename));
        }
    }

    if let Some(home) = dirs::home_dir() {
        let app_dir = home.join(".config").join(APP_ID);
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join(APP_ID);
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::IoError` if it cannot be read, and
/// `ConfigError::ParseError` if it is not valid JSONC.
pub fn load_config_from_path(path: &Path) -> Result<(HomescreenConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: HomescreenConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the
/// expected locations, or the errors of [`load_config_from_path`].
pub fn load_config() -> Result<(HomescreenConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = HomescreenConfig::default();
        assert_eq!(config.wallpapers.default, DEFAULT_WALLPAPER);
        assert_eq!(config.wallpapers.naming, WallpaperNaming::Timestamped);
        assert_eq!(config.notifications.show_delay_ms, DEFAULT_SHOW_DELAY_MS);
        assert_eq!(config.clock.date_format, DateFormat::Mdy);
        assert!(!config.device.development_device);
        assert!(config.host.capabilities.is_empty());
    }

    #[test]
    fn test_config_deserializes_partial_jsonc() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.jsonc");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{
                // Custom wallpapers
                "wallpapers": {{ "naming": "reserved", "expectedFormat": "png" }},
                /* show immediately */
                "notifications": {{ "showDelayMs": 0 }},
                "clock": {{ "dateFormat": "DMY", "use24Hour": true }}
            }}"#
        )
        .unwrap();

        let (config, loaded_from) = load_config_from_path(&path).unwrap();
        assert_eq!(loaded_from, path);
        assert_eq!(config.wallpapers.naming, WallpaperNaming::Reserved);
        assert_eq!(config.wallpapers.expected_format, ExpectedFormat::Png);
        assert_eq!(config.wallpapers.default, DEFAULT_WALLPAPER);
        assert_eq!(config.notifications.show_delay_ms, 0);
        assert_eq!(config.clock.date_format, DateFormat::Dmy);
        assert!(config.clock.use_24_hour);
        assert_eq!(config.clock.weather_every_ticks, DEFAULT_WEATHER_EVERY_TICKS);
    }

    #[test]
    fn test_load_config_from_missing_path() {
        let result = load_config_from_path(Path::new("/nonexistent/homescreen.jsonc"));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_config_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ \"wallpapers\": ").unwrap();

        let result = load_config_from_path(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_paths_are_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.to_string_lossy().contains("homescreen")));
    }

    #[test]
    fn test_skill_dir_resolves_relative_to_base() {
        let config = WallpaperConfig::default();
        let resolved = config.skill_dir(Path::new("/opt/homescreen"));
        assert_eq!(resolved, PathBuf::from("/opt/homescreen/ui/wallpapers"));
    }

    #[test]
    fn test_empty_user_dir_uses_data_dir() {
        let config = WallpaperConfig::default();
        let resolved = config.user_dir(Path::new("/opt/homescreen"));
        assert!(resolved.ends_with("homescreen/wallpapers"));
    }

    #[test]
    fn test_expected_format_extension() {
        assert_eq!(ExpectedFormat::Jpeg.extension(), "jpg");
        assert_eq!(ExpectedFormat::Png.extension(), "png");
        assert_eq!(ExpectedFormat::Png.image_format(), image::ImageFormat::Png);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound;
        assert!(err.to_string().contains("No configuration file found"));
    }
}
