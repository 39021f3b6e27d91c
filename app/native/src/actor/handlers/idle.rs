//! Idle page handlers: clock ticks, activation, and forwarded responses.

use chrono::NaiveDateTime;
use serde_json::{Value, json};

use super::notifications::publish_model;
use super::wallpaper::publish_selection;
use crate::config::ClockConfig;
use crate::events::{alarms, fields, weather};
use crate::host::DisplaySurface;
use crate::idle::{BuildInfo, IdleClock};
use crate::notifications::NotificationStore;
use crate::wallpaper::WallpaperManager;

/// Handles a clock tick.
///
/// Publishes only the clock fields that changed. Every
/// `weather_every_ticks` ticks it also asks for fresh weather and alarms.
pub fn on_tick(
    clock: &mut IdleClock,
    config: &ClockConfig,
    surface: &dyn DisplaySurface,
    now: &NaiveDateTime,
    tick: u64,
) {
    for (field, value) in clock.refresh(now, config) {
        surface.publish(field, json!(value));
    }

    let every = u64::from(config.weather_every_ticks);
    if every > 0 && tick.is_multiple_of(every) {
        request_refresh(surface);
    }
}

/// Everything the idle page needs when it becomes visible.
pub struct IdlePage<'a> {
    pub clock: &'a mut IdleClock,
    pub config: &'a ClockConfig,
    pub build_info: &'a BuildInfo,
    pub store: &'a NotificationStore,
    pub wallpapers: &'a WallpaperManager,
}

/// Publishes the full idle page and requests weather and alarms.
pub fn on_activate_idle(page: IdlePage<'_>, surface: &dyn DisplaySurface, now: &NaiveDateTime) {
    tracing::debug!("activating idle page");

    page.clock.refresh(now, page.config);
    for (field, value) in page.clock.snapshot() {
        surface.publish(field, json!(value));
    }

    surface.publish(fields::BUILD_DATE, json!(page.build_info.build_date));
    publish_selection(page.wallpapers, surface);
    surface.publish(fields::NOTIFICATION, json!({}));
    publish_model(page.store, surface);

    request_refresh(surface);
}

/// Forwards a weather response to the view model.
pub fn on_weather_response(
    surface: &dyn DisplaySurface,
    temperature: Value,
    weather_condition: Value,
) {
    surface.publish(fields::WEATHER_TEMPERATURE, temperature);
    surface.publish(fields::WEATHER_CONDITION, weather_condition);
}

/// Forwards an alarm response to the view model.
pub fn on_alarms_response(surface: &dyn DisplaySurface, active_alarms: Value) {
    surface.publish(fields::ACTIVE_ALARMS, active_alarms);
}

fn request_refresh(surface: &dyn DisplaySurface) {
    surface.emit(weather::REQUEST, Value::Null);
    surface.emit(alarms::QUERY, Value::Null);
}
