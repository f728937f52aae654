//! Notification records as they arrive from the REST collections and the
//! live feed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single notification.
///
/// Only `message` and `notification_type` are interpreted. Everything else
/// the server sends is kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub message: String,
    /// Category label. The group broadcast sends bare `{ "message": .. }`
    /// frames, so a missing label reads as empty.
    #[serde(default)]
    pub notification_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NotificationItem {
    pub fn new(message: impl Into<String>, notification_type: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            notification_type: notification_type.into(),
            extra: Map::new(),
        }
    }

    /// Exact message + category match, used by the dedup rule.
    pub fn same_notification(&self, other: &NotificationItem) -> bool {
        self.message == other.message && self.notification_type == other.notification_type
    }

    /// Decode a live-feed text frame.
    pub fn from_frame(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// `{ "data": [...] }` body returned by every collection endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEnvelope {
    #[serde(default)]
    pub data: Option<Vec<NotificationItem>>,
}

impl ListEnvelope {
    /// Missing or null `data` is an empty batch.
    pub fn into_items(self) -> Vec<NotificationItem> {
        self.data.unwrap_or_default()
    }
}
