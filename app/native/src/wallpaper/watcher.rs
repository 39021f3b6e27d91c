//! User wallpaper directory watcher.
//!
//! Notices images copied into (or removed from) the user directory by other
//! processes so the collection can be rebuilt.

use std::path::{Path, PathBuf};
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use super::processing::is_supported_image;
use crate::platform::spawn_named_thread;

/// Quiet period after the last change before rescanning.
/// Copying a file produces several events (create, modify, close).
const RESCAN_DEBOUNCE_MS: u64 = 250;

/// Starts watching `dir` on a background thread.
///
/// `on_change` runs once image changes have been quiet for the debounce
/// window, so a burst of copies triggers a single rescan. The watcher stops when `on_change` returns `false`.
pub fn watch_user_directory<F>(dir: PathBuf, mut on_change: F)
where F: FnMut() -> bool + Send + 'static {
    spawn_named_thread("wallpaper-watcher", move || {
        let (tx, rx) = std::sync::mpsc::channel();

        let mut watcher: RecommendedWatcher = match notify::recommended_watcher(tx) {
            Ok(w) => w,
            Err(err) => {
                tracing::warn!(error = %err, "failed to create wallpaper directory watcher");
                return;
            }
        };

        if let Err(err) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
            tracing::warn!(
                path = %dir.display(),
                error = %err,
                "failed to watch wallpaper directory"
            );
            return;
        }

        tracing::debug!(path = %dir.display(), "watching wallpaper directory");

        let debounce = Duration::from_millis(RESCAN_DEBOUNCE_MS);
        let mut pending = false;

        loop {
            let received = if pending {
                rx.recv_timeout(debounce)
            } else {
                rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
            };

            match received {
                Ok(Ok(event)) => pending |= touches_image(&event),
                Ok(Err(err)) => tracing::warn!(error = %err, "wallpaper watch error"),
                Err(RecvTimeoutError::Timeout) => {
                    pending = false;
                    if !on_change() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    });
}

fn touches_image(event: &Event) -> bool {
    event.paths.iter().any(|path| is_image_path(path))
}

fn is_image_path(path: &Path) -> bool {
    is_supported_image(path)
        && path.file_name().and_then(|n| n.to_str()).is_some_and(|n| !n.starts_with('.'))
}
