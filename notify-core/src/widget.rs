//! The two widgets and their fixed wiring: which collections they load,
//! which socket they listen on, and which pushed items they keep.

use crate::category::{normalize_category, Tone};
use crate::item::NotificationItem;
use serde::{Deserialize, Serialize};

/// A REST collection loaded at mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Key used for endpoint overrides in the config file.
    pub key: &'static str,
    pub default_path: &'static str,
    /// Shown in place of the list when this fetch fails.
    pub error_message: &'static str,
}

impl Resource {
    pub const MAINTENANCE_ALERT: Resource = Resource {
        key: "maintenance_alert",
        default_path: "/api/maintenance-alert/",
        error_message: "Failed to fetch maintenance alerts. Please try again later.",
    };

    pub const NOTIFICATION: Resource = Resource {
        key: "notification",
        default_path: "/api/notification/",
        error_message: "Failed to fetch notifications. Please try again later.",
    };

    pub const ANNOUNCEMENTS: Resource = Resource {
        key: "announcements",
        default_path: "/api/announcements/",
        error_message: "Failed to fetch announcements alerts. Please try again later.",
    };

    // Same collection as MAINTENANCE_ALERT, but the notifications widget has
    // always requested it with an underscore. Kept as-is until the backend
    // contract says which spelling is canonical.
    pub const NOTIFICATION_MAINTENANCE: Resource = Resource {
        key: "notification_maintenance_alert",
        default_path: "/api/maintenance_alert/",
        error_message: "Failed to fetch maintenance alerts. Please try again later.",
    };
}

/// Categories the maintenance widget keeps from the live feed.
const MAINTENANCE_PUSH_TAGS: &[&str] = &["maintenance alert"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Maintenance,
    Notifications,
}

impl WidgetKind {
    pub fn all() -> &'static [WidgetKind] {
        &[WidgetKind::Maintenance, WidgetKind::Notifications]
    }

    pub fn title(&self) -> &'static str {
        match self {
            WidgetKind::Maintenance => "Maintenance Alerts",
            WidgetKind::Notifications => "Notifications",
        }
    }

    pub fn loading_text(&self) -> &'static str {
        match self {
            WidgetKind::Maintenance => "Loading maintenance alerts...",
            WidgetKind::Notifications => "Loading notifications...",
        }
    }

    pub fn empty_text(&self) -> &'static str {
        match self {
            WidgetKind::Maintenance => "No maintenance alerts yet.",
            WidgetKind::Notifications => "No notifications yet.",
        }
    }

    /// Collections in merge order: slot 0 first, later slots appended.
    pub fn resources(&self) -> &'static [Resource] {
        match self {
            WidgetKind::Maintenance => &[Resource::MAINTENANCE_ALERT],
            WidgetKind::Notifications => &[
                Resource::NOTIFICATION,
                Resource::ANNOUNCEMENTS,
                Resource::NOTIFICATION_MAINTENANCE,
            ],
        }
    }

    /// Path appended to the websocket base URL. The trailing slash differs
    /// between the two widgets; do not unify without the server routes.
    pub fn socket_path(&self) -> &'static str {
        match self {
            WidgetKind::Maintenance => "/ws/notification/",
            WidgetKind::Notifications => "/ws/notification",
        }
    }

    /// Whether a pushed item belongs in this widget's list at all.
    pub fn accepts(&self, item: &NotificationItem) -> bool {
        match self {
            WidgetKind::Maintenance => {
                !item.message.is_empty()
                    && MAINTENANCE_PUSH_TAGS.contains(&normalize_category(&item.notification_type).as_str())
            }
            WidgetKind::Notifications => true,
        }
    }

    /// Whether pushed items are checked against held items before insert.
    pub fn dedups_pushes(&self) -> bool {
        matches!(self, WidgetKind::Notifications)
    }

    /// Tone forced on every row, bypassing the category table.
    pub fn fixed_tone(&self) -> Option<Tone> {
        match self {
            WidgetKind::Maintenance => Some(Tone::Orange),
            WidgetKind::Notifications => None,
        }
    }
}
