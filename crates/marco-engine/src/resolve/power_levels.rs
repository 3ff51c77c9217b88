use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EventError;

fn default_room_notification_level() -> i64 {
    50
}

/// Content of an `m.room.power_levels` state event, as far as notifying a
/// room goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerLevels {
    #[serde(default)]
    pub users: HashMap<String, i64>,
    #[serde(default)]
    pub users_default: i64,
    #[serde(default)]
    pub notifications: NotificationLevels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLevels {
    #[serde(default = "default_room_notification_level")]
    pub room: i64,
}

impl Default for NotificationLevels {
    fn default() -> Self {
        Self {
            room: default_room_notification_level(),
        }
    }
}

impl PowerLevels {
    pub fn from_json(json: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn user_level(&self, user_id: &str) -> i64 {
        self.users
            .get(user_id)
            .copied()
            .unwrap_or(self.users_default)
    }

    /// Whether `user_id` may mention `@room`.
    pub fn can_notify_room(&self, user_id: &str) -> bool {
        self.user_level(user_id) >= self.notifications.room
    }
}
