//! Active and archived notification collections.

use super::types::{Notification, NotificationView};

/// Result of [`NotificationStore::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyOutcome {
    /// Whether the notification was added to the active list.
    pub accepted: bool,
    /// Length of the active list after the call.
    pub active_count: usize,
}

/// Owns the active and archived notifications.
///
/// - `active` is in arrival order with structural duplicates suppressed.
/// - `archive` is in dismissal order and may hold duplicates.
/// - Popped entries move from `active` to `archive`; deleted entries are
///   dropped without being archived.
#[derive(Debug, Default)]
pub struct NotificationStore {
    active: Vec<Notification>,
    archive: Vec<Notification>,
}

impl NotificationStore {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Adds a notification unless an equal one is already active.
    ///
    /// The caller fires the "show" trigger only when `accepted` is true.
    pub fn notify(&mut self, notification: Notification) -> NotifyOutcome {
        if self.active.contains(&notification) {
            return NotifyOutcome {
                accepted: false,
                active_count: self.active.len(),
            };
        }

        self.active.push(notification);
        NotifyOutcome {
            accepted: true,
            active_count: self.active.len(),
        }
    }

    /// Moves the earliest active entry with the same `(sender, text)` to the archive.
    ///
    /// Returns `false` (no-op) when nothing matches.
    pub fn dismiss(&mut self, notification: &Notification) -> bool {
        match take_first_match(&mut self.active, notification) {
            Some(removed) => {
                self.archive.push(removed);
                true
            }
            None => false,
        }
    }

    /// Removes the earliest active entry with the same `(sender, text)` without archiving it.
    pub fn dismiss_and_delete(&mut self, notification: &Notification) -> bool {
        take_first_match(&mut self.active, notification).is_some()
    }

    /// Empties the archive. Returns `false` if it was already empty.
    pub fn clear_archive(&mut self) -> bool {
        let had_entries = !self.archive.is_empty();
        self.archive.clear();
        had_entries
    }

    /// Removes every archived entry with the same `(sender, text)`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_archived(&mut self, notification: &Notification) -> usize {
        let before = self.archive.len();
        self.archive.retain(|archived| !archived.same_origin(notification));
        before - self.archive.len()
    }

    #[must_use]
    pub fn active(&self) -> &[Notification] { &self.active }

    #[must_use]
    pub fn archive(&self) -> &[Notification] { &self.archive }

    /// Snapshot for the display surface.
    #[must_use]
    pub fn view(&self) -> NotificationView {
        NotificationView {
            active: self.active.clone(),
            archive: self.archive.clone(),
            archive_count: self.archive.len(),
        }
    }
}

/// Removes and returns the first entry matching by `(sender, text)`.
fn take_first_match(list: &mut Vec<Notification>, key: &Notification) -> Option<Notification> {
    let position = list.iter().position(|entry| entry.same_origin(key))?;
    Some(list.remove(position))
}
