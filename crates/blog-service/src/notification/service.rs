//! Notification queries and read-state management.

use std::sync::Arc;

use uuid::Uuid;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_core::types::pagination::{PageRequest, PageResponse};
use blog_database::repositories::notification::NotificationRepository;
use blog_entity::notification::model::Notification;

/// Upper bound on a recent-unread fetch.
const MAX_RECENT_LIMIT: i64 = 50;

/// Read model over a user's notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    notification_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Create a new notification service.
    pub fn new(notification_repo: Arc<NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    /// The most recent unread notifications for a recipient, newest
    /// first, capped at `limit`.
    pub async fn recent_unread(
        &self,
        recipient_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<Notification>> {
        let limit = limit.clamp(1, MAX_RECENT_LIMIT);
        self.notification_repo
            .find_unread_by_user(recipient_id, limit)
            .await
    }

    /// Count unread notifications for a recipient.
    pub async fn unread_count(&self, recipient_id: Uuid) -> AppResult<i64> {
        self.notification_repo.count_unread(recipient_id).await
    }

    /// List all of a recipient's notifications with pagination.
    pub async fn list_for_user(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.notification_repo.find_by_user(recipient_id, page).await
    }

    /// Mark one notification as read. Recipient-scoped: marking a
    /// notification that belongs to someone else is a not-found.
    pub async fn mark_read(&self, recipient_id: Uuid, notification_id: Uuid) -> AppResult<()> {
        let updated = self
            .notification_repo
            .mark_read(notification_id, recipient_id)
            .await?;

        if !updated {
            return Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            )));
        }
        Ok(())
    }

    /// Mark all of a recipient's notifications as read. Returns how many
    /// flipped.
    pub async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        self.notification_repo.mark_all_read(recipient_id).await
    }
}
