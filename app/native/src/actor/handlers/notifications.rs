//! Notification event handlers.

use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::mpsc;

use super::to_json;
use crate::actor::HomescreenMessage;
use crate::events::{fields, notification};
use crate::host::DisplaySurface;
use crate::notifications::{Notification, NotificationStore};

/// Handles a notification arrival.
///
/// Returns `true` if the notification was accepted and should be shown.
pub fn on_notification_set(
    store: &mut NotificationStore,
    surface: &dyn DisplaySurface,
    notification: Notification,
) -> bool {
    let payload = to_json(&notification);
    let outcome = store.notify(notification);

    if !outcome.accepted {
        tracing::debug!("duplicate notification ignored");
        return false;
    }

    surface.publish(fields::NOTIFICATION, payload);
    surface.publish(fields::NOTIFICATION_COUNTER, json!(outcome.active_count));
    true
}

/// Fires the show trigger after `delay`.
///
/// A zero delay emits immediately. Otherwise a timer task posts
/// [`HomescreenMessage::ShowNotification`] back to the actor, so the actor
/// keeps processing events while the pause runs.
pub fn schedule_show(
    delay: Duration,
    surface: &dyn DisplaySurface,
    sender: &mpsc::WeakSender<HomescreenMessage>,
) {
    if delay.is_zero() {
        surface.emit(notification::SHOW, Value::Null);
        return;
    }

    let sender = sender.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let delivered = match sender.upgrade() {
            Some(sender) => sender.send(HomescreenMessage::ShowNotification).await.is_ok(),
            None => false,
        };
        if !delivered {
            tracing::debug!("actor stopped before notification was shown");
        }
    });
}

/// Handles the user dismissing the popped notification.
pub fn on_pop_clear(store: &mut NotificationStore, surface: &dyn DisplaySurface, key: &Notification) {
    if store.dismiss(key) {
        publish_counter(store, surface);
        publish_model(store, surface);
    } else {
        tracing::debug!(sender = %key.sender, "dismissed notification not active");
    }
    surface.publish(fields::NOTIFICATION, json!({}));
}

/// Handles the user dismissing and deleting the popped notification.
pub fn on_pop_clear_delete(
    store: &mut NotificationStore,
    surface: &dyn DisplaySurface,
    key: &Notification,
) {
    if store.dismiss_and_delete(key) {
        publish_counter(store, surface);
    } else {
        tracing::debug!(sender = %key.sender, "deleted notification not active");
    }
    surface.publish(fields::NOTIFICATION, json!({}));
}

/// Handles the user clearing the archive.
pub fn on_storage_clear(store: &mut NotificationStore, surface: &dyn DisplaySurface) {
    if store.clear_archive() {
        publish_model(store, surface);
    }
}

/// Handles the user removing one archived notification.
pub fn on_storage_item_rm(
    store: &mut NotificationStore,
    surface: &dyn DisplaySurface,
    key: &Notification,
) {
    let removed = store.remove_archived(key);
    if removed > 0 {
        tracing::debug!(removed, "removed archived notifications");
        publish_model(store, surface);
    }
}

/// Publishes the archive model.
pub fn publish_model(store: &NotificationStore, surface: &dyn DisplaySurface) {
    surface.publish(fields::NOTIFICATION_MODEL, to_json(&store.view().stored_model()));
}

fn publish_counter(store: &NotificationStore, surface: &dyn DisplaySurface) {
    surface.publish(fields::NOTIFICATION_COUNTER, json!(store.active().len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::handlers::test_support::{Recorder, surface};
    use crate::host::HostContract;

    fn note(sender: &str, text: &str) -> Notification {
        Notification::new(sender, text, "open", "transient")
    }

    #[test]
    fn test_accepted_notification_publishes_fields() {
        let (surface, mut out) = surface(HostContract::Legacy);
        let mut store = NotificationStore::new();

        assert!(on_notification_set(&mut store, surface.as_ref(), note("s1", "t1")));

        let messages = out.drain();
        assert_eq!(Recorder::fields(&messages, fields::NOTIFICATION_COUNTER), vec![json!(1)]);
        assert_eq!(
            Recorder::fields(&messages, fields::NOTIFICATION)[0]["sender"],
            json!("s1")
        );
    }

    #[test]
    fn test_duplicate_notification_publishes_nothing() {
        let (surface, mut out) = surface(HostContract::Legacy);
        let mut store = NotificationStore::new();
        on_notification_set(&mut store, surface.as_ref(), note("s1", "t1"));
        out.drain();

        assert!(!on_notification_set(&mut store, surface.as_ref(), note("s1", "t1")));
        assert!(out.drain().is_empty());
    }

    #[tokio::test]
    async fn test_zero_delay_shows_immediately() {
        let (surface, mut out) = surface(HostContract::Legacy);
        let (tx, _rx) = mpsc::channel(4);

        schedule_show(Duration::ZERO, surface.as_ref(), &tx.downgrade());

        assert_eq!(Recorder::triggers(&out.drain()), vec![notification::SHOW]);
    }

    #[tokio::test]
    async fn test_delayed_show_posts_message() {
        let (surface, mut out) = surface(HostContract::Legacy);
        let (tx, mut rx) = mpsc::channel(4);

        schedule_show(Duration::from_millis(10), surface.as_ref(), &tx.downgrade());

        assert!(out.drain().is_empty());
        let message = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert!(matches!(message, Some(HomescreenMessage::ShowNotification)));
    }

    #[test]
    fn test_pop_clear_archives_and_clears_popup() {
        let (surface, mut out) = surface(HostContract::Legacy);
        let mut store = NotificationStore::new();
        store.notify(note("s1", "t1"));

        on_pop_clear(&mut store, surface.as_ref(), &Notification::new("s1", "t1", "", ""));

        let messages = out.drain();
        let model = Recorder::fields(&messages, fields::NOTIFICATION_MODEL);
        assert_eq!(model[0]["count"], json!(1));
        assert_eq!(model[0]["storedmodel"][0]["action"], json!("open"));
        assert_eq!(Recorder::fields(&messages, fields::NOTIFICATION), vec![json!({})]);
    }

    #[test]
    fn test_pop_clear_unknown_only_clears_popup() {
        let (surface, mut out) = surface(HostContract::Legacy);
        let mut store = NotificationStore::new();

        on_pop_clear(&mut store, surface.as_ref(), &note("nobody", "nothing"));

        let messages = out.drain();
        assert!(Recorder::fields(&messages, fields::NOTIFICATION_MODEL).is_empty());
        assert!(store.archive().is_empty());
    }

    #[test]
    fn test_pop_clear_delete_does_not_publish_model() {
        let (surface, mut out) = surface(HostContract::Legacy);
        let mut store = NotificationStore::new();
        store.notify(note("s1", "t1"));

        on_pop_clear_delete(&mut store, surface.as_ref(), &note("s1", "t1"));

        let messages = out.drain();
        assert!(Recorder::fields(&messages, fields::NOTIFICATION_MODEL).is_empty());
        assert_eq!(Recorder::fields(&messages, fields::NOTIFICATION_COUNTER), vec![json!(0)]);
        assert!(store.archive().is_empty());
    }

    #[test]
    fn test_storage_edits_publish_only_on_change() {
        let (surface, mut out) = surface(HostContract::Legacy);
        let mut store = NotificationStore::new();

        on_storage_clear(&mut store, surface.as_ref());
        on_storage_item_rm(&mut store, surface.as_ref(), &note("s1", "t1"));
        assert!(out.drain().is_empty());

        store.notify(note("s1", "t1"));
        store.dismiss(&note("s1", "t1"));
        on_storage_item_rm(&mut store, surface.as_ref(), &note("s1", "t1"));

        let model = Recorder::fields(&out.drain(), fields::NOTIFICATION_MODEL);
        assert_eq!(model, vec![json!({ "storedmodel": [], "count": 0 })]);
    }
}
