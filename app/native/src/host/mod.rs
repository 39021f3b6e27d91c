//! Display host integration.
//!
//! The host renders the idle screen and relays bus events. Everything the core
//! sends it goes through a [`DisplaySurface`], chosen once at startup from the
//! capabilities the host advertises.

pub mod surface;

use serde::Serialize;
use serde_json::Value;

use crate::config::HostConfig;
pub use surface::{CurrentSurface, DisplaySurface, LegacySurface, OutboundSender};

/// Capability name for hosts that load wallpapers by absolute path.
pub const WALLPAPER_PATH_CAPABILITY: &str = "wallpaper_path";

/// Capabilities advertised by the display host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host accepts a full wallpaper path instead of a built-in file name.
    pub wallpaper_path: bool,
}

impl HostCapabilities {
    #[must_use]
    pub fn from_config(config: &HostConfig) -> Self {
        Self {
            wallpaper_path: config
                .capabilities
                .iter()
                .any(|cap| cap.eq_ignore_ascii_case(WALLPAPER_PATH_CAPABILITY)),
        }
    }
}

/// The host contract variant the surface speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostContract {
    /// Wallpaper published as a file name under `selected_wallpaper`.
    Legacy,
    /// Wallpaper published as a full path under `wallpaper_path`.
    Current,
}

impl HostContract {
    #[must_use]
    pub const fn detect(capabilities: HostCapabilities) -> Self {
        if capabilities.wallpaper_path { Self::Current } else { Self::Legacy }
    }

    /// Builds the surface for this contract.
    #[must_use]
    pub fn surface(self, sender: OutboundSender) -> Box<dyn DisplaySurface> {
        match self {
            Self::Legacy => Box::new(LegacySurface::new(sender)),
            Self::Current => Box::new(CurrentSurface::new(sender)),
        }
    }
}

/// A message from the core to the host.
///
/// Serialized one per line on stdout by the `run` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    /// Set a view-model field.
    Field { name: String, value: Value },
    /// Emit a bus event.
    Trigger { event: String, data: Value },
}
