//! Handler modules for the homescreen actor.
//!
//! - `notifications` - notification arrival, dismissal, and archive edits
//! - `wallpaper` - rotation, selection, downloads, and rescans
//! - `idle` - clock ticks, idle page activation, and forwarded responses

pub mod idle;
pub mod notifications;
pub mod wallpaper;

use serde::Serialize;
use serde_json::Value;

pub use idle::{IdlePage, on_activate_idle, on_alarms_response, on_tick, on_weather_response};
pub use notifications::{
    on_notification_set, on_pop_clear, on_pop_clear_delete, on_storage_clear, on_storage_item_rm,
    schedule_show,
};
pub use wallpaper::{
    on_next_wallpaper, on_rescan, on_select_wallpaper, on_wallpaper_fetched, on_wallpaper_set,
};

/// Encodes a view-model value, logging (and publishing `null`) on failure.
fn to_json(value: &impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        tracing::error!(error = %err, "failed to encode view-model value");
        Value::Null
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::Value;
    use tokio::sync::mpsc;

    use crate::host::{DisplaySurface, HostContract, Outbound};

    /// A surface whose output can be inspected.
    pub fn surface(contract: HostContract) -> (Box<dyn DisplaySurface>, Recorder) {
        let (tx, rx) = mpsc::unbounded_channel();
        (contract.surface(tx), Recorder(rx))
    }

    pub struct Recorder(mpsc::UnboundedReceiver<Outbound>);

    impl Recorder {
        pub fn drain(&mut self) -> Vec<Outbound> {
            let mut out = Vec::new();
            while let Ok(message) = self.0.try_recv() {
                out.push(message);
            }
            out
        }

        /// Values published for `field`, oldest first.
        pub fn fields(messages: &[Outbound], field: &str) -> Vec<Value> {
            messages
                .iter()
                .filter_map(|m| match m {
                    Outbound::Field { name, value } if name == field => Some(value.clone()),
                    _ => None,
                })
                .collect()
        }

        /// Names of the triggers emitted, oldest first.
        pub fn triggers(messages: &[Outbound]) -> Vec<String> {
            messages
                .iter()
                .filter_map(|m| match m {
                    Outbound::Trigger { event, .. } => Some(event.clone()),
                    Outbound::Field { .. } => None,
                })
                .collect()
        }
    }
}
