//! Image helpers for the wallpaper collection.
//!
//! Directory listing, payload validation, and the file names given to
//! downloaded wallpapers.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Timelike;
use image::ImageReader;
use natord::compare;

use super::WallpaperError;
use crate::config::{ExpectedFormat, WallpaperNaming};
use crate::constants::{RESERVED_WALLPAPER_STEM, WALLPAPER_FILE_PREFIX};

/// Supported image file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Checks if a file has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Lists the file names of all supported images in a directory.
///
/// Names are sorted with natural ordering (`wallpaper-2` before
/// `wallpaper-10`). A missing directory lists as empty.
pub fn list_images_in_directory(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect();

    names.sort_by(|a, b| compare(a, b));
    names
}

/// Checks that the file at `path` decodes as an image of `expected` format.
///
/// The format is sniffed from the content, not the file name.
///
/// # Errors
///
/// Returns [`WallpaperError::Validation`] if the format differs or the image
/// does not decode.
pub fn validate_image_file(path: &Path, expected: ExpectedFormat) -> Result<(), WallpaperError> {
    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|err| WallpaperError::io(path, err))?;

    match reader.format() {
        Some(format) if format == expected.image_format() => {}
        Some(format) => {
            return Err(WallpaperError::Validation(format!(
                "expected {} data, got {}",
                expected.extension(),
                format.extensions_str().first().copied().unwrap_or("unknown")
            )));
        }
        None => {
            return Err(WallpaperError::Validation("payload is not a known image format".into()));
        }
    }

    reader.decode().map_err(|err| WallpaperError::Validation(err.to_string()))?;
    Ok(())
}

/// File name for a downloaded wallpaper.
///
/// `timestamped` yields `wallpaper-HHMMSS.<ext>` from the time of day;
/// `reserved` always yields `custom-wallpaper.<ext>`.
pub fn generated_file_name(
    naming: WallpaperNaming,
    format: ExpectedFormat,
    time_of_day: &impl Timelike,
) -> String {
    let ext = format.extension();
    match naming {
        WallpaperNaming::Timestamped => format!(
            "{WALLPAPER_FILE_PREFIX}{:02}{:02}{:02}.{ext}",
            time_of_day.hour(),
            time_of_day.minute(),
            time_of_day.second()
        ),
        WallpaperNaming::Reserved => format!("{RESERVED_WALLPAPER_STEM}.{ext}"),
    }
}

/// Case-insensitive file stem of a wallpaper name.
pub fn stem_of(name: &str) -> Option<String> {
    PathBuf::from(name).file_stem().and_then(|s| s.to_str()).map(str::to_lowercase)
}
