//! Notification lifecycle.
//!
//! Notifications arrive as values, pop on screen once, and are then either
//! archived or deleted by the user.

pub mod store;
pub mod types;

pub use store::{NotificationStore, NotifyOutcome};
pub use types::{Notification, NotificationView, StoredModel};
