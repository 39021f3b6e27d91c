//! Path utilities for shell-like path expansion.
//!
//! Configured directories (wallpapers, settings, build info) may use `~`
//! and may be relative to the configuration file.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to the user's home directory.
///
/// Absolute and relative paths are returned unchanged; surrounding
/// whitespace is trimmed and an empty input yields an empty path.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}

/// Expands `~` and resolves relative paths against `base_dir`.
///
/// ```ignore
/// let base = Path::new("/etc/homescreen");
/// assert_eq!(expand_and_resolve("ui/wallpapers", base), PathBuf::from("/etc/homescreen/ui/wallpapers"));
/// ```
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand(path);

    if expanded.as_os_str().is_empty() || expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}
