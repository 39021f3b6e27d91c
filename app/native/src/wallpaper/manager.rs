//! Wallpaper manager for handling the collection, selection, and cycling.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveTime};
use serde::Serialize;
use tempfile::NamedTempFile;

use super::processing::{self, generated_file_name, stem_of};
use super::{WallpaperError, WallpaperFetcher};
use crate::config::{ExpectedFormat, WallpaperConfig, WallpaperNaming};

/// Where a wallpaper came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WallpaperOrigin {
    /// Shipped in the built-in wallpaper directory.
    BuiltIn,
    /// Added at runtime to the user directory.
    UserAdded,
}

/// A wallpaper in the collection, identified by file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WallpaperEntry {
    pub name: String,
    pub origin: WallpaperOrigin,
}

impl WallpaperEntry {
    #[must_use]
    pub fn built_in(name: impl Into<String>) -> Self {
        Self { name: name.into(), origin: WallpaperOrigin::BuiltIn }
    }

    #[must_use]
    pub fn user_added(name: impl Into<String>) -> Self {
        Self { name: name.into(), origin: WallpaperOrigin::UserAdded }
    }
}

/// Manages the wallpaper collection and the selected wallpaper.
///
/// `collection` lists built-in wallpapers, then user-added ones, each group in
/// natural file name order. It is rebuilt wholesale by [`rescan`]. `selected`
/// survives rescans and may go stale; every operation that moves it heals a
/// stale selection.
///
/// [`rescan`]: WallpaperManager::rescan
#[derive(Debug)]
pub struct WallpaperManager {
    skill_dir: PathBuf,
    user_dir: PathBuf,
    naming: WallpaperNaming,
    expected_format: ExpectedFormat,
    default: WallpaperEntry,
    collection: Vec<WallpaperEntry>,
    selected: WallpaperEntry,
}

impl WallpaperManager {
    /// Creates a manager from configuration and scans both directories.
    ///
    /// Relative directories resolve against `base_dir`. The user directory is
    /// created if missing. The selection starts at the default wallpaper.
    ///
    /// # Errors
    ///
    /// Returns an error if the user directory cannot be created.
    pub fn new(config: &WallpaperConfig, base_dir: &Path) -> Result<Self, WallpaperError> {
        let skill_dir = config.skill_dir(base_dir);
        let user_dir = config.user_dir(base_dir);

        if user_dir.exists() && !user_dir.is_dir() {
            return Err(WallpaperError::InvalidPath(format!(
                "{} is not a directory",
                user_dir.display()
            )));
        }
        fs::create_dir_all(&user_dir).map_err(|err| WallpaperError::io(&user_dir, err))?;

        if !skill_dir.is_dir() {
            tracing::warn!(
                path = %skill_dir.display(),
                "built-in wallpaper directory not found"
            );
        }

        let default = WallpaperEntry::built_in(config.default.clone());
        let mut manager = Self {
            skill_dir,
            user_dir,
            naming: config.naming,
            expected_format: config.expected_format,
            selected: default.clone(),
            default,
            collection: Vec::new(),
        };
        manager.rescan();
        Ok(manager)
    }

    /// Rebuilds the collection from both directories.
    pub fn rescan(&mut self) {
        let built_in = processing::list_images_in_directory(&self.skill_dir)
            .into_iter()
            .map(WallpaperEntry::built_in);
        let user = processing::list_images_in_directory(&self.user_dir)
            .into_iter()
            .map(WallpaperEntry::user_added);
        self.collection = built_in.chain(user).collect();

        tracing::debug!(count = self.collection.len(), "rescanned wallpapers");

        if self.selected != self.default && !self.collection.contains(&self.selected) {
            tracing::warn!(
                wallpaper = %self.selected.name,
                "selected wallpaper is no longer available"
            );
        }
    }

    /// Advances the selection and returns the new selected entry.
    ///
    /// Wraps from the last entry to the first. A stale selection jumps to the
    /// first entry; an empty collection selects the default.
    pub fn next(&mut self) -> WallpaperEntry {
        if self.collection.is_empty() {
            tracing::debug!("no wallpapers to cycle, selecting default");
            self.selected = self.default.clone();
            return self.selected.clone();
        }

        let next_index = match self.position_of(&self.selected) {
            Some(index) => (index + 1) % self.collection.len(),
            None => {
                tracing::warn!(
                    wallpaper = %self.selected.name,
                    "selected wallpaper is stale, restarting from the first"
                );
                0
            }
        };

        self.selected = self.collection[next_index].clone();
        self.selected.clone()
    }

    /// Selects a wallpaper by name, falling back to the default on a miss.
    ///
    /// Matches the exact file name, then the file name ignoring case, then the
    /// file stem ignoring case (`"beach"` selects `Beach.jpg`).
    pub fn select(&mut self, name: &str) -> WallpaperEntry {
        if let Some(entry) = self.find(name) {
            self.selected = entry.clone();
        } else {
            tracing::debug!(wallpaper = %name, "wallpaper not found, selecting default");
            self.selected = self.default.clone();
        }
        self.selected.clone()
    }

    /// Looks a name up with the same matching rules as [`select`], without
    /// moving the selection.
    ///
    /// [`select`]: WallpaperManager::select
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&WallpaperEntry> { self.find(name) }

    /// Restores the persisted selection at startup.
    pub fn restore(&mut self, name: Option<&str>) -> WallpaperEntry {
        match name {
            Some(name) => self.select(name),
            None => {
                self.selected = self.default.clone();
                self.selected.clone()
            }
        }
    }

    /// Downloads a wallpaper into the user directory and selects it.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch, validation, or write fails. Nothing is
    /// written and the collection and selection are unchanged on failure.
    pub fn add(
        &mut self,
        source_url: &str,
        fetcher: &dyn WallpaperFetcher,
    ) -> Result<WallpaperEntry, WallpaperError> {
        let bytes = fetcher.fetch(source_url)?;
        self.add_bytes(&bytes, Local::now().time())
    }

    /// Commits already-fetched wallpaper bytes.
    ///
    /// The bytes go to a temporary file in the user directory, are validated
    /// against the expected format, and are then renamed to the generated
    /// name. `time_of_day` feeds the timestamped naming scheme; a timestamped
    /// name that is already taken gets a numeric suffix instead of replacing
    /// the existing file. The reserved name is always overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid image of the expected
    /// format or cannot be written.
    pub fn add_bytes(
        &mut self,
        bytes: &[u8],
        time_of_day: NaiveTime,
    ) -> Result<WallpaperEntry, WallpaperError> {
        let mut staged =
            NamedTempFile::new_in(&self.user_dir).map_err(|err| self.user_dir_error(err))?;
        staged.write_all(bytes).map_err(|err| self.user_dir_error(err))?;
        staged.flush().map_err(|err| self.user_dir_error(err))?;

        processing::validate_image_file(staged.path(), self.expected_format)?;

        let name = generated_file_name(self.naming, self.expected_format, &time_of_day);
        let name = match self.naming {
            WallpaperNaming::Reserved => {
                let target = self.user_dir.join(&name);
                staged.persist(&target).map_err(|err| WallpaperError::io(&target, err.error))?;
                name
            }
            WallpaperNaming::Timestamped => self.persist_unique(staged, &name)?,
        };

        tracing::info!(wallpaper = %name, "added wallpaper");

        self.rescan();
        let entry = WallpaperEntry::user_added(name);
        if self.collection.contains(&entry) {
            self.selected = entry.clone();
        } else {
            self.select(&entry.name);
        }
        Ok(self.selected.clone())
    }

    /// Resolves an entry to a file, trying the built-in directory first.
    #[must_use]
    pub fn resolve_path(&self, entry: &WallpaperEntry) -> Option<PathBuf> {
        [&self.skill_dir, &self.user_dir]
            .into_iter()
            .map(|dir| dir.join(&entry.name))
            .find(|candidate| candidate.is_file())
    }

    /// Path of the selected wallpaper, falling back to the default.
    ///
    /// When neither resolves, this is where the default is expected in the
    /// built-in directory.
    #[must_use]
    pub fn selected_path(&self) -> PathBuf {
        self.resolve_path(&self.selected)
            .or_else(|| {
                tracing::warn!(
                    wallpaper = %self.selected.name,
                    "selected wallpaper cannot be resolved, using default"
                );
                self.resolve_path(&self.default)
            })
            .unwrap_or_else(|| self.skill_dir.join(&self.default.name))
    }

    #[must_use]
    pub fn collection(&self) -> &[WallpaperEntry] { &self.collection }

    #[must_use]
    pub const fn selected(&self) -> &WallpaperEntry { &self.selected }

    #[must_use]
    pub const fn default_entry(&self) -> &WallpaperEntry { &self.default }

    #[must_use]
    pub fn user_dir(&self) -> &Path { &self.user_dir }

    /// Whether the selection is missing from the collection.
    #[must_use]
    pub fn is_stale(&self) -> bool { !self.collection.contains(&self.selected) }

    fn position_of(&self, entry: &WallpaperEntry) -> Option<usize> {
        self.collection.iter().position(|candidate| candidate == entry)
    }

    fn find(&self, name: &str) -> Option<&WallpaperEntry> {
        let stem = stem_of(name);
        self.collection
            .iter()
            .find(|entry| entry.name == name)
            .or_else(|| self.collection.iter().find(|entry| entry.name.eq_ignore_ascii_case(name)))
            .or_else(|| {
                self.collection
                    .iter()
                    .find(|entry| stem.is_some() && stem_of(&entry.name) == stem)
            })
    }

    /// Moves `staged` to `name` in the user directory without replacing an
    /// existing file, trying `stem-1.ext`, `stem-2.ext`, ... on a clash.
    fn persist_unique(
        &self,
        mut staged: NamedTempFile,
        name: &str,
    ) -> Result<String, WallpaperError> {
        let (stem, ext) = name.rsplit_once('.').unwrap_or((name, ""));
        let mut attempt = 0_u32;

        loop {
            let candidate =
                if attempt == 0 { name.to_string() } else { format!("{stem}-{attempt}.{ext}") };
            let target = self.user_dir.join(&candidate);

            match staged.persist_noclobber(&target) {
                Ok(_) => return Ok(candidate),
                Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(wallpaper = %candidate, "generated name taken, retrying");
                    staged = err.file;
                    attempt += 1;
                }
                Err(err) => return Err(WallpaperError::io(&target, err.error)),
            }
        }
    }

    fn user_dir_error(&self, err: std::io::Error) -> WallpaperError {
        WallpaperError::io(&self.user_dir, err)
    }
}
