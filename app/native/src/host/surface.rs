//! Display surface implementations.

use std::path::Path;

use serde_json::{Value, json};
use tokio::sync::mpsc;

use super::{HostContract, Outbound};
use crate::events::fields;
use crate::wallpaper::WallpaperEntry;

/// Channel carrying outbound messages to the host writer.
pub type OutboundSender = mpsc::UnboundedSender<Outbound>;

/// The view model and bus as seen from the core.
pub trait DisplaySurface: Send {
    /// Sets a view-model field.
    fn publish(&self, field: &str, value: Value);

    /// Emits a bus event.
    fn emit(&self, event: &str, data: Value);

    /// Publishes the selected wallpaper in the form the host understands.
    fn publish_wallpaper(&self, entry: &WallpaperEntry, path: &Path);

    /// The contract variant this surface implements.
    fn contract(&self) -> HostContract;
}

/// Shared outbound channel handling.
#[derive(Debug, Clone)]
struct Outlet {
    sender: OutboundSender,
}

impl Outlet {
    fn send(&self, message: Outbound) {
        if self.sender.send(message).is_err() {
            tracing::debug!("host output closed, dropping message");
        }
    }

    fn field(&self, name: &str, value: Value) {
        self.send(Outbound::Field { name: name.to_string(), value });
    }

    fn trigger(&self, event: &str, data: Value) {
        self.send(Outbound::Trigger { event: event.to_string(), data });
    }
}

/// Hosts that only know built-in wallpapers by file name.
#[derive(Debug, Clone)]
pub struct LegacySurface {
    outlet: Outlet,
}

impl LegacySurface {
    #[must_use]
    pub const fn new(sender: OutboundSender) -> Self { Self { outlet: Outlet { sender } } }
}

impl DisplaySurface for LegacySurface {
    fn publish(&self, field: &str, value: Value) { self.outlet.field(field, value); }

    fn emit(&self, event: &str, data: Value) { self.outlet.trigger(event, data); }

    fn publish_wallpaper(&self, entry: &WallpaperEntry, _path: &Path) {
        self.outlet.field(fields::SELECTED_WALLPAPER, json!(entry.name));
    }

    fn contract(&self) -> HostContract { HostContract::Legacy }
}

/// Hosts that load the wallpaper from an absolute path.
#[derive(Debug, Clone)]
pub struct CurrentSurface {
    outlet: Outlet,
}

impl CurrentSurface {
    #[must_use]
    pub const fn new(sender: OutboundSender) -> Self { Self { outlet: Outlet { sender } } }
}

impl DisplaySurface for CurrentSurface {
    fn publish(&self, field: &str, value: Value) { self.outlet.field(field, value); }

    fn emit(&self, event: &str, data: Value) { self.outlet.trigger(event, data); }

    fn publish_wallpaper(&self, _entry: &WallpaperEntry, path: &Path) {
        self.outlet.field(fields::WALLPAPER_PATH, json!(path.display().to_string()));
    }

    fn contract(&self) -> HostContract { HostContract::Current }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn drain(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> Vec<Outbound> {
        let mut out = Vec::new();
        while let Ok(message) = rx.try_recv() {
            out.push(message);
        }
        out
    }

    #[test]
    fn test_legacy_publishes_wallpaper_name() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let surface = HostContract::Legacy.surface(tx);

        surface.publish_wallpaper(
            &WallpaperEntry::user_added("wallpaper-120000.jpg"),
            &PathBuf::from("/data/wallpapers/wallpaper-120000.jpg"),
        );

        assert_eq!(drain(&mut rx), vec![Outbound::Field {
            name: fields::SELECTED_WALLPAPER.into(),
            value: json!("wallpaper-120000.jpg"),
        }]);
    }

    #[test]
    fn test_current_publishes_wallpaper_path() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let surface = HostContract::Current.surface(tx);
        assert_eq!(surface.contract(), HostContract::Current);

        surface.publish_wallpaper(
            &WallpaperEntry::built_in("default.png"),
            &PathBuf::from("/opt/ui/wallpapers/default.png"),
        );

        assert_eq!(drain(&mut rx), vec![Outbound::Field {
            name: fields::WALLPAPER_PATH.into(),
            value: json!("/opt/ui/wallpapers/default.png"),
        }]);
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let surface = LegacySurface::new(tx);

        surface.emit("homescreen.notification.show", Value::Null);
    }
}
