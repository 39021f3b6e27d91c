//! Wallpaper sources.

use std::fs;
use std::io::ErrorKind;

use super::FetchError;
use crate::platform::path::expand;

/// Retrieves the raw bytes of a wallpaper.
///
/// Implementations may block; callers run them off the event loop.
pub trait WallpaperFetcher: Send + Sync {
    /// Fetches the payload at `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the source is unavailable.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Reads wallpapers from the local filesystem.
///
/// Accepts `file://` URLs and plain paths (with `~` expansion). Any other
/// scheme is rejected with [`FetchError::UnsupportedScheme`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFetcher;

impl WallpaperFetcher for LocalFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let location = match url.split_once("://") {
            Some(("file", rest)) => rest,
            Some((scheme, _)) => return Err(FetchError::UnsupportedScheme(scheme.to_string())),
            None => url,
        };

        let path = expand(location);
        fs::read(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => FetchError::NotFound(url.to_string()),
            _ => FetchError::Io { url: url.to_string(), source: err },
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_fetch_plain_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sky.jpg");
        fs::write(&path, b"bytes").unwrap();

        let bytes = LocalFetcher.fetch(path.to_str().unwrap()).unwrap();
        assert_eq!(bytes, b"bytes");
    }

    #[test]
    fn test_fetch_file_url() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sky.jpg");
        fs::write(&path, b"bytes").unwrap();

        let url = format!("file://{}", path.display());
        assert_eq!(LocalFetcher.fetch(&url).unwrap(), b"bytes");
    }

    #[test]
    fn test_fetch_missing_file() {
        let err = LocalFetcher.fetch("file:///nonexistent/sky.jpg").unwrap_err();
        assert!(matches!(err, FetchError::NotFound(url) if url == "file:///nonexistent/sky.jpg"));
    }

    #[test]
    fn test_fetch_rejects_http() {
        let err = LocalFetcher.fetch("https://example.com/sky.jpg").unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(scheme) if scheme == "https"));
    }
}
