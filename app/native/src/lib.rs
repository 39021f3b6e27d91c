//! Homescreen - the idle screen of a voice assistant device.
//!
//! This library keeps the notification store, the wallpaper collection, and
//! the idle clock, and talks to its display host over a JSON message bus.
//! The binary wires it to stdin/stdout; the CLI also manages wallpapers
//! offline.

pub mod actor;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod host;
pub mod idle;
pub mod notifications;
pub mod platform;
pub mod schema;
pub mod settings;
pub mod wallpaper;

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV_VAR;

/// Installs the global tracing subscriber.
///
/// The filter is read from `HOMESCREEN_LOG` (e.g. `homescreen_lib=debug`) and
/// defaults to `info`. Logs go to stderr, which keeps stdout free for bus
/// traffic. Calling this twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
