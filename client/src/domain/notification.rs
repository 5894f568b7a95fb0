//! In-app notifications and the unread badge count.

use serde::{Deserialize, Serialize};

use super::{NotificationId, UserId};

/// A message addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id")]
    id: NotificationId,
    #[serde(rename = "user")]
    recipient: UserId,
    #[serde(default)]
    description: String,
    #[serde(default)]
    read: bool,
}

impl Notification {
    /// Build a notification from decoded parts.
    pub fn new(
        id: NotificationId,
        recipient: UserId,
        description: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            id,
            recipient,
            description: description.into(),
            read,
        }
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn recipient(&self) -> &UserId {
        &self.recipient
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn is_read(&self) -> bool {
        self.read
    }
}

/// Body of `POST /api/notifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNotification {
    pub user: UserId,
    pub description: String,
}

/// Badge value: notifications not yet read.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read()).count()
}
