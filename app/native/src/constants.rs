//! Application-wide constants.

/// Application identifier used for config, cache, and data directories.
pub const APP_ID: &str = "homescreen";

/// Wallpaper shown when no setting exists or the selection is stale.
pub const DEFAULT_WALLPAPER: &str = "default.png";

/// Settings key under which the selected wallpaper name is persisted.
pub const WALLPAPER_SETTING_KEY: &str = "wallpaper";

/// Prefix for wallpapers saved with the timestamped naming scheme.
pub const WALLPAPER_FILE_PREFIX: &str = "wallpaper-";

/// File stem of the single reserved custom wallpaper slot.
pub const RESERVED_WALLPAPER_STEM: &str = "custom-wallpaper";

/// Default pause between accepting a notification and showing it.
pub const DEFAULT_SHOW_DELAY_MS: u64 = 2000;

/// Ticks between weather/alarm refresh requests (one tick every 10 seconds).
pub const DEFAULT_WEATHER_EVERY_TICKS: u32 = 90;

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "HOMESCREEN_LOG";

/// Seconds between clock ticks when serving the bus.
pub const DEFAULT_TICK_SECS: u64 = 10;
