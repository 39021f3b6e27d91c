//! Message types for the homescreen actor.
//!
//! - `InboundEvent` - bus events decoded from the host
//! - `HomescreenMessage` - everything the actor processes
//! - `HomescreenSnapshot` - the response to a query

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::HomescreenError;
use crate::events;
use crate::host::HostContract;
use crate::notifications::{Notification, NotificationView};
use crate::wallpaper::{FetchError, WallpaperEntry, WallpaperFetcher};

// ============================================================================
// Inbound bus events
// ============================================================================

/// A bus event addressed to the homescreen.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// A notification arrived.
    NotificationSet(Notification),
    /// Dismiss the popped notification into the archive.
    NotificationPopClear(Notification),
    /// Dismiss the popped notification without archiving it.
    NotificationPopClearDelete(Notification),
    /// Empty the archive.
    NotificationStorageClear,
    /// Remove a notification from the archive.
    NotificationStorageItemRm(Notification),
    /// Download and select a wallpaper.
    WallpaperSet { url: String },
    /// Rotate to the next wallpaper.
    WallpaperNext,
    /// Weather provider response, forwarded as-is.
    WeatherResponse { temperature: Value, weather_condition: Value },
    /// Alarm service response, forwarded as-is.
    AlarmsResponse { active_alarms: Value },
}

/// Payload of events that reference a notification by `(sender, text)`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NotificationRef {
    notification: Notification,
}

#[derive(Debug, Deserialize)]
struct WallpaperSetPayload {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WeatherPayload {
    temperature: Value,
    weather_condition: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AlarmsPayload {
    active_alarms: Value,
}

/// A bus message as written by the host: `{ "event": ..., "data": ... }`.
#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

impl InboundEvent {
    /// Decodes a bus event from its name and payload.
    ///
    /// A `null` payload is treated as `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`HomescreenError::EventError`] for unknown events or payloads
    /// of the wrong shape.
    pub fn decode(event: &str, data: Value) -> Result<Self, HomescreenError> {
        let data = if data.is_null() { Value::Object(serde_json::Map::new()) } else { data };

        let decoded = match event {
            events::notification::SET => Self::NotificationSet(serde_json::from_value(data)?),
            events::notification::POP_CLEAR => Self::NotificationPopClear(
                serde_json::from_value::<NotificationRef>(data)?.notification,
            ),
            events::notification::POP_CLEAR_DELETE => Self::NotificationPopClearDelete(
                serde_json::from_value::<NotificationRef>(data)?.notification,
            ),
            events::notification::STORAGE_CLEAR => Self::NotificationStorageClear,
            events::notification::STORAGE_ITEM_RM => Self::NotificationStorageItemRm(
                serde_json::from_value::<NotificationRef>(data)?.notification,
            ),
            events::wallpaper::SET => {
                let payload: WallpaperSetPayload = serde_json::from_value(data)?;
                Self::WallpaperSet { url: payload.url }
            }
            events::wallpaper::NEXT => Self::WallpaperNext,
            events::weather::RESPONSE => {
                let payload: WeatherPayload = serde_json::from_value(data)?;
                Self::WeatherResponse {
                    temperature: payload.temperature,
                    weather_condition: payload.weather_condition,
                }
            }
            events::alarms::RESPONSE => {
                let payload: AlarmsPayload = serde_json::from_value(data)?;
                Self::AlarmsResponse { active_alarms: payload.active_alarms }
            }
            other => return Err(HomescreenError::EventError(format!("unknown event: {other}"))),
        };

        Ok(decoded)
    }

    /// Decodes one line of newline-delimited JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HomescreenError::EventError`] if the line is not an envelope
    /// or the event cannot be decoded.
    pub fn from_json_line(line: &str) -> Result<Self, HomescreenError> {
        let envelope: Envelope = serde_json::from_str(line)?;
        Self::decode(&envelope.event, envelope.data)
    }

    /// The bus name of this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NotificationSet(_) => events::notification::SET,
            Self::NotificationPopClear(_) => events::notification::POP_CLEAR,
            Self::NotificationPopClearDelete(_) => events::notification::POP_CLEAR_DELETE,
            Self::NotificationStorageClear => events::notification::STORAGE_CLEAR,
            Self::NotificationStorageItemRm(_) => events::notification::STORAGE_ITEM_RM,
            Self::WallpaperSet { .. } => events::wallpaper::SET,
            Self::WallpaperNext => events::wallpaper::NEXT,
            Self::WeatherResponse { .. } => events::weather::RESPONSE,
            Self::AlarmsResponse { .. } => events::alarms::RESPONSE,
        }
    }
}

// ============================================================================
// Actor messages
// ============================================================================

/// Messages sent to the homescreen actor.
#[derive(Debug)]
pub enum HomescreenMessage {
    /// A decoded bus event.
    Bus(InboundEvent),

    /// Periodic clock tick.
    Tick { now: NaiveDateTime },

    /// Rotate to the next wallpaper.
    NextWallpaper,

    /// Select a wallpaper by name.
    SelectWallpaper { name: String },

    /// A wallpaper download finished.
    WallpaperFetched {
        url: String,
        result: Result<Vec<u8>, FetchError>,
    },

    /// Rebuild the wallpaper collection from disk.
    Rescan,

    /// The idle page became visible; publish everything it shows.
    ActivateIdle,

    /// The show delay for an accepted notification elapsed.
    ShowNotification,

    /// Request a snapshot of the current state.
    Query {
        respond_to: oneshot::Sender<HomescreenSnapshot>,
    },

    /// Stop the actor.
    Shutdown,
}

impl HomescreenMessage {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bus(event) => event.name(),
            Self::Tick { .. } => "Tick",
            Self::NextWallpaper => "NextWallpaper",
            Self::SelectWallpaper { .. } => "SelectWallpaper",
            Self::WallpaperFetched { .. } => "WallpaperFetched",
            Self::Rescan => "Rescan",
            Self::ActivateIdle => "ActivateIdle",
            Self::ShowNotification => "ShowNotification",
            Self::Query { .. } => "Query",
            Self::Shutdown => "Shutdown",
        }
    }
}

/// Point-in-time view of the actor state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomescreenSnapshot {
    pub notifications: NotificationView,
    pub wallpapers: Vec<WallpaperEntry>,
    pub selected_wallpaper: WallpaperEntry,
    pub wallpaper_path: PathBuf,
    pub build_date: String,
    pub contract: HostContract,
}

/// Type-erased fetcher shared with blocking tasks.
pub type SharedFetcher = std::sync::Arc<dyn WallpaperFetcher>;
