//! Centralized bus event and view-model field names.
//!
//! All names exchanged with the host are defined here so the inbound decoder,
//! the actor, and the display surfaces agree on them.
//!
//! ## Naming Convention
//!
//! Bus events follow the pattern: `homescreen.<module>.<event-name>`
//!
//! - `homescreen.` - Prefix identifying this as a Homescreen event
//! - `<module>` - The feature that owns the event (e.g., `notification`, `wallpaper`)
//! - `<event-name>` - Dot-separated name of the event
//!
//! View-model fields keep the names the idle screen markup reads.

/// Notification events.
pub mod notification {
    /// A new notification arrived.
    ///
    /// Payload: `{ sender, text, action, type }`
    pub const SET: &str = "homescreen.notification.set";

    /// The user dismissed the popped notification (archive it).
    ///
    /// Payload: `{ notification: { sender, text } }`
    pub const POP_CLEAR: &str = "homescreen.notification.pop.clear";

    /// The user dismissed and deleted the popped notification.
    ///
    /// Payload: `{ notification: { sender, text } }`
    pub const POP_CLEAR_DELETE: &str = "homescreen.notification.pop.clear.delete";

    /// The user cleared the whole archive.
    ///
    /// Payload: `{}`
    pub const STORAGE_CLEAR: &str = "homescreen.notification.storage.clear";

    /// The user removed a single archived notification.
    ///
    /// Payload: `{ notification: { sender, text } }`
    pub const STORAGE_ITEM_RM: &str = "homescreen.notification.storage.item.rm";

    /// Emitted once per accepted notification to pop it on screen.
    ///
    /// Payload: `()` (no payload)
    pub const SHOW: &str = "homescreen.notification.show";
}

/// Wallpaper events.
pub mod wallpaper {
    /// Add a wallpaper from a source URL and select it.
    ///
    /// Payload: `{ url }`
    pub const SET: &str = "homescreen.wallpaper.set";

    /// Rotate to the next wallpaper in the collection.
    ///
    /// Payload: `{}`
    pub const NEXT: &str = "homescreen.wallpaper.next";

    /// Emitted after the selected wallpaper changed.
    ///
    /// Payload: `{ name }`
    pub const CHANGED: &str = "homescreen.wallpaper.changed";

    /// Emitted when adding a wallpaper failed.
    ///
    /// Payload: `HomescreenError`
    pub const ERROR: &str = "homescreen.wallpaper.error";
}

/// Weather events.
pub mod weather {
    /// Emitted on schedule to ask the weather provider for fresh data.
    pub const REQUEST: &str = "homescreen.weather.request";

    /// Weather provider response.
    ///
    /// Payload: `{ temperature, weather_condition }`
    pub const RESPONSE: &str = "homescreen.weather.response";
}

/// Alarm events.
pub mod alarms {
    /// Emitted on schedule to ask the alarm service for active alarms.
    pub const QUERY: &str = "homescreen.alarms.query";

    /// Alarm service response.
    ///
    /// Payload: `{ active_alarms: bool }`
    pub const RESPONSE: &str = "homescreen.alarms.response";
}

/// View-model field names published to the display surface.
pub mod fields {
    pub const NOTIFICATION: &str = "notification";
    pub const NOTIFICATION_COUNTER: &str = "notification_counter";
    pub const NOTIFICATION_MODEL: &str = "notification_model";
    pub const SELECTED_WALLPAPER: &str = "selected_wallpaper";
    pub const WALLPAPER_PATH: &str = "wallpaper_path";
    pub const TIME: &str = "homeScreenTime";
    pub const DATE: &str = "homeScreenDate";
    pub const WEEKDAY: &str = "homeScreenWeekday";
    pub const MONTH: &str = "homeScreenMonth";
    pub const DAY: &str = "homeScreenDay";
    pub const YEAR: &str = "homeScreenYear";
    pub const BUILD_DATE: &str = "buildDate";
    pub const WEATHER_TEMPERATURE: &str = "weatherTemperature";
    pub const WEATHER_CONDITION: &str = "weatherCondition";
    pub const ACTIVE_ALARMS: &str = "activeAlarms";
}
