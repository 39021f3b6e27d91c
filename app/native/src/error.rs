//! Error types for Homescreen.
//!
//! This module provides the crate-level error surfaced by the CLI and by the
//! event loop. Component-specific errors (`WallpaperError`, `FetchError`,
//! `ConfigError`, `SettingsError`) live next to the code that raises them and
//! convert into `HomescreenError` at the boundary.

use serde::Serialize;
use thiserror::Error;

use crate::actor::ActorError;
use crate::config::ConfigError;
use crate::settings::SettingsError;
use crate::wallpaper::WallpaperError;

/// Errors that can occur during application execution.
///
/// Serializes as `{ "kind": ..., "message": ... }` so it can be reported on
/// the host bus as-is.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum HomescreenError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// A wallpaper source could not be retrieved.
    #[error("Fetch error: {0}")]
    FetchError(String),
    /// A wallpaper payload is not an image of the expected format.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Wallpaper operation failed.
    #[error("Wallpaper error: {0}")]
    WallpaperError(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Settings could not be read or written.
    #[error("Settings error: {0}")]
    SettingsError(String),
    /// Inbound event could not be decoded.
    #[error("Event error: {0}")]
    EventError(String),
    /// The event loop is not running.
    #[error("Event loop error: {0}")]
    ActorError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for HomescreenError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for HomescreenError {
    fn from(err: serde_json::Error) -> Self { Self::EventError(err.to_string()) }
}

impl From<WallpaperError> for HomescreenError {
    fn from(err: WallpaperError) -> Self {
        match err {
            WallpaperError::Fetch(fetch) => Self::FetchError(fetch.to_string()),
            WallpaperError::Validation(reason) => Self::ValidationError(reason),
            other => Self::WallpaperError(other.to_string()),
        }
    }
}

impl From<ConfigError> for HomescreenError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<SettingsError> for HomescreenError {
    fn from(err: SettingsError) -> Self { Self::SettingsError(err.to_string()) }
}

impl From<ActorError> for HomescreenError {
    fn from(err: ActorError) -> Self { Self::ActorError(err.to_string()) }
}
