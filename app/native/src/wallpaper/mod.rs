//! Wallpaper collection, selection, and downloads.
//!
//! The [`WallpaperManager`] keeps an ordered collection of built-in and
//! user-added wallpapers plus a single selected entry. Downloads go through a
//! [`WallpaperFetcher`] and are validated before anything touches the user
//! directory.

pub mod fetch;
pub mod manager;
pub mod processing;
pub mod watcher;

pub use fetch::{LocalFetcher, WallpaperFetcher};
pub use manager::{WallpaperEntry, WallpaperManager, WallpaperOrigin};
use thiserror::Error;

/// Errors raised while retrieving a wallpaper from its source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source does not exist.
    #[error("wallpaper source not found: {0}")]
    NotFound(String),
    /// The URL scheme is not handled by this fetcher.
    #[error("unsupported wallpaper source: {0}")]
    UnsupportedScheme(String),
    /// The source exists but could not be read.
    #[error("failed to read wallpaper source {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur in wallpaper management.
#[derive(Debug, Error)]
pub enum WallpaperError {
    /// The download failed.
    #[error("failed to fetch wallpaper: {0}")]
    Fetch(#[from] FetchError),
    /// The payload is not an image of the expected format.
    #[error("invalid wallpaper image: {0}")]
    Validation(String),
    /// A file in a wallpaper directory could not be written.
    #[error("wallpaper file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The collection is empty.
    #[error("no wallpapers available")]
    NoWallpapers,
    /// A configured wallpaper directory is unusable.
    #[error("invalid wallpaper path: {0}")]
    InvalidPath(String),
}

impl WallpaperError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_wraps_into_wallpaper_error() {
        let err: WallpaperError = FetchError::UnsupportedScheme("ftp".to_string()).into();
        assert!(matches!(err, WallpaperError::Fetch(FetchError::UnsupportedScheme(_))));
        assert_eq!(
            err.to_string(),
            "failed to fetch wallpaper: unsupported wallpaper source: ftp"
        );
    }

    #[test]
    fn test_io_error_includes_path() {
        let err = WallpaperError::io(
            std::path::Path::new("/data/wallpapers"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/data/wallpapers"));
    }
}
