//! Notification value types and the view models published for them.

use serde::{Deserialize, Deserializer, Serialize};

/// A user-facing notification.
///
/// A notification is its content: equality is structural over all four
/// fields and there is no identifier. Missing or `null` fields decode as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    #[serde(deserialize_with = "null_as_empty")]
    pub sender: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub action: String,
    #[serde(rename = "type", deserialize_with = "null_as_empty")]
    pub kind: String,
}

impl Notification {
    /// Creates a notification from its four fields.
    #[must_use]
    pub fn new(
        sender: impl Into<String>,
        text: impl Into<String>,
        action: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            action: action.into(),
            kind: kind.into(),
        }
    }

    /// Whether `other` refers to this notification by `(sender, text)`.
    ///
    /// UI clear/delete commands only carry sender and text, so lookups
    /// ignore `action` and `type`.
    #[must_use]
    pub fn same_origin(&self, other: &Self) -> bool {
        self.sender == other.sender && self.text == other.text
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Archive model in the shape the idle screen reads (`notification_model`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredModel {
    pub storedmodel: Vec<Notification>,
    pub count: usize,
}

/// Snapshot of both collections, published whenever either changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub active: Vec<Notification>,
    pub archive: Vec<Notification>,
    pub archive_count: usize,
}

impl NotificationView {
    /// The archive part of the view as the idle screen consumes it.
    #[must_use]
    pub fn stored_model(&self) -> StoredModel {
        StoredModel {
            storedmodel: self.archive.clone(),
            count: self.archive_count,
        }
    }
}
