//! Wallpaper event handlers.
//!
//! Every handler that moves the selection announces it the same way: publish
//! the wallpaper, persist its name, and emit `homescreen.wallpaper.changed`.

use chrono::NaiveTime;
use serde_json::json;
use tokio::sync::mpsc;

use super::to_json;
use crate::actor::HomescreenMessage;
use crate::actor::messages::SharedFetcher;
use crate::constants::WALLPAPER_SETTING_KEY;
use crate::error::HomescreenError;
use crate::events::wallpaper;
use crate::host::DisplaySurface;
use crate::settings::Settings;
use crate::wallpaper::{FetchError, WallpaperError, WallpaperManager};

/// Starts a download on the blocking pool.
///
/// The result comes back to the actor as [`HomescreenMessage::WallpaperFetched`].
pub fn on_wallpaper_set(
    url: String,
    fetcher: SharedFetcher,
    sender: mpsc::WeakSender<HomescreenMessage>,
) {
    tracing::debug!(url = %url, "fetching wallpaper");

    tokio::task::spawn_blocking(move || {
        let result = fetcher.fetch(&url);
        let Some(sender) = sender.upgrade() else {
            return;
        };
        if sender.blocking_send(HomescreenMessage::WallpaperFetched { url, result }).is_err() {
            tracing::debug!("actor stopped before wallpaper download finished");
        }
    });
}

/// Commits a finished download.
///
/// On failure nothing changes; the error is logged and emitted on the bus.
pub fn on_wallpaper_fetched(
    wallpapers: &mut WallpaperManager,
    surface: &dyn DisplaySurface,
    settings: &dyn Settings,
    url: &str,
    result: Result<Vec<u8>, FetchError>,
    time_of_day: NaiveTime,
) {
    let committed = result
        .map_err(WallpaperError::from)
        .and_then(|bytes| wallpapers.add_bytes(&bytes, time_of_day));

    match committed {
        Ok(entry) => {
            tracing::info!(url = %url, wallpaper = %entry.name, "wallpaper set from source");
            announce_selection(wallpapers, surface, settings);
        }
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "failed to add wallpaper");
            let error = HomescreenError::from(err);
            surface.emit(wallpaper::ERROR, json!({ "url": url, "error": to_json(&error) }));
        }
    }
}

/// Rotates to the next wallpaper.
pub fn on_next_wallpaper(
    wallpapers: &mut WallpaperManager,
    surface: &dyn DisplaySurface,
    settings: &dyn Settings,
) {
    let entry = wallpapers.next();
    tracing::debug!(wallpaper = %entry.name, "next wallpaper");
    announce_selection(wallpapers, surface, settings);
}

/// Selects a wallpaper by name (default on a miss).
pub fn on_select_wallpaper(
    wallpapers: &mut WallpaperManager,
    surface: &dyn DisplaySurface,
    settings: &dyn Settings,
    name: &str,
) {
    let entry = wallpapers.select(name);
    tracing::debug!(requested = %name, wallpaper = %entry.name, "selected wallpaper");
    announce_selection(wallpapers, surface, settings);
}

/// Rebuilds the collection; republishes the wallpaper if the selection went stale.
pub fn on_rescan(wallpapers: &mut WallpaperManager, surface: &dyn DisplaySurface) {
    wallpapers.rescan();
    if wallpapers.is_stale() {
        publish_selection(wallpapers, surface);
    }
}

/// Publishes the selected wallpaper without persisting it.
pub fn publish_selection(wallpapers: &WallpaperManager, surface: &dyn DisplaySurface) {
    surface.publish_wallpaper(wallpapers.selected(), &wallpapers.selected_path());
}

fn announce_selection(
    wallpapers: &WallpaperManager,
    surface: &dyn DisplaySurface,
    settings: &dyn Settings,
) {
    let selected = wallpapers.selected();
    publish_selection(wallpapers, surface);

    if let Err(err) = settings.set(WALLPAPER_SETTING_KEY, json!(selected.name)) {
        tracing::warn!(error = %err, "failed to persist wallpaper selection");
    }

    surface.emit(wallpaper::CHANGED, json!({ "name": selected.name }));
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use serde_json::Value;
    use tempfile::TempDir;

    use super::*;
    use crate::actor::handlers::test_support::{Recorder, surface};
    use crate::config::WallpaperConfig;
    use crate::events::fields;
    use crate::host::HostContract;
    use crate::settings::MemorySettings;
    use crate::wallpaper::processing::test_images;

    fn manager(root: &TempDir, built_in: &[&str]) -> WallpaperManager {
        let skill = root.path().join("skill");
        fs::create_dir_all(&skill).unwrap();
        for name in built_in {
            fs::write(skill.join(name), test_images::png()).unwrap();
        }
        let config = WallpaperConfig {
            skill_directory: skill.display().to_string(),
            user_directory: root.path().join("user").display().to_string(),
            ..Default::default()
        };
        WallpaperManager::new(&config, Path::new("/")).unwrap()
    }

    fn noon() -> NaiveTime { NaiveTime::from_hms_opt(12, 0, 0).unwrap() }

    #[test]
    fn test_next_publishes_persists_and_announces() {
        let root = TempDir::new().unwrap();
        let mut wallpapers = manager(&root, &["a.png", "b.png"]);
        let (surface, mut out) = surface(HostContract::Legacy);
        let settings = MemorySettings::new();

        on_next_wallpaper(&mut wallpapers, surface.as_ref(), &settings);

        let messages = out.drain();
        assert_eq!(Recorder::fields(&messages, fields::SELECTED_WALLPAPER), vec![json!("a.png")]);
        assert_eq!(Recorder::triggers(&messages), vec![wallpaper::CHANGED]);
        assert_eq!(settings.get_str(WALLPAPER_SETTING_KEY).as_deref(), Some("a.png"));
    }

    #[test]
    fn test_current_contract_publishes_path() {
        let root = TempDir::new().unwrap();
        let mut wallpapers = manager(&root, &["a.png"]);
        let (surface, mut out) = surface(HostContract::Current);
        let settings = MemorySettings::new();

        on_select_wallpaper(&mut wallpapers, surface.as_ref(), &settings, "a.png");

        let paths = Recorder::fields(&out.drain(), fields::WALLPAPER_PATH);
        let expected = root.path().join("skill").join("a.png");
        assert_eq!(paths, vec![json!(expected.display().to_string())]);
    }

    #[test]
    fn test_fetched_success_selects_new_wallpaper() {
        let root = TempDir::new().unwrap();
        let mut wallpapers = manager(&root, &["a.png"]);
        let (surface, mut out) = surface(HostContract::Legacy);
        let settings = MemorySettings::new();

        on_wallpaper_fetched(
            &mut wallpapers,
            surface.as_ref(),
            &settings,
            "file:///tmp/x.jpg",
            Ok(test_images::jpeg()),
            noon(),
        );

        assert_eq!(wallpapers.selected().name, "wallpaper-120000.jpg");
        assert_eq!(
            settings.get_str(WALLPAPER_SETTING_KEY).as_deref(),
            Some("wallpaper-120000.jpg")
        );
        assert_eq!(Recorder::triggers(&out.drain()), vec![wallpaper::CHANGED]);
    }

    #[test]
    fn test_fetched_failure_emits_error_and_changes_nothing() {
        let root = TempDir::new().unwrap();
        let mut wallpapers = manager(&root, &["a.png"]);
        wallpapers.select("a.png");
        let (surface, mut out) = surface(HostContract::Legacy);
        let settings = MemorySettings::new();

        on_wallpaper_fetched(
            &mut wallpapers,
            surface.as_ref(),
            &settings,
            "file:///missing.jpg",
            Err(FetchError::NotFound("file:///missing.jpg".into())),
            noon(),
        );

        let messages = out.drain();
        assert_eq!(Recorder::triggers(&messages), vec![wallpaper::ERROR]);
        assert!(Recorder::fields(&messages, fields::SELECTED_WALLPAPER).is_empty());
        let Some(crate::host::Outbound::Trigger { data, .. }) = messages.last() else {
            panic!("expected an error trigger");
        };
        assert_eq!(data["error"]["kind"], json!("FetchError"));
        assert_eq!(data["url"], json!("file:///missing.jpg"));
        assert_eq!(wallpapers.selected().name, "a.png");
        assert_eq!(settings.get(WALLPAPER_SETTING_KEY, Value::Null), Value::Null);
    }

    #[test]
    fn test_fetched_invalid_image_reports_validation_error() {
        let root = TempDir::new().unwrap();
        let mut wallpapers = manager(&root, &[]);
        let (surface, mut out) = surface(HostContract::Legacy);
        let settings = MemorySettings::new();

        on_wallpaper_fetched(
            &mut wallpapers,
            surface.as_ref(),
            &settings,
            "file:///page.html",
            Ok(b"<html></html>".to_vec()),
            noon(),
        );

        let messages = out.drain();
        let Some(crate::host::Outbound::Trigger { data, .. }) = messages.last() else {
            panic!("expected an error trigger");
        };
        assert_eq!(data["error"]["kind"], json!("ValidationError"));
        assert!(wallpapers.collection().is_empty());
    }

    #[test]
    fn test_rescan_republishes_when_selection_disappears() {
        let root = TempDir::new().unwrap();
        let mut wallpapers = manager(&root, &["a.png", "b.png"]);
        wallpapers.select("b.png");
        let (surface, mut out) = surface(HostContract::Legacy);

        on_rescan(&mut wallpapers, surface.as_ref());
        assert!(out.drain().is_empty());

        fs::remove_file(root.path().join("skill").join("b.png")).unwrap();
        on_rescan(&mut wallpapers, surface.as_ref());
        assert_eq!(out.drain().len(), 1);
    }
}
