//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::NotificationKind;

/// A notification delivered to a user's inbox.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// The post that triggered the notification.
    pub post_id: Uuid,
    /// The event kind.
    pub kind: NotificationKind,
    /// Notification message text.
    pub message: String,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

/// Data required to create a new notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// The recipient user.
    pub user_id: Uuid,
    /// The post that triggered the notification.
    pub post_id: Uuid,
    /// The event kind.
    pub kind: NotificationKind,
    /// Notification message text.
    pub message: String,
}
