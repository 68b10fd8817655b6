//! Author and admin dashboard aggregates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_database::repositories::comment::CommentRepository;
use blog_database::repositories::notification::NotificationRepository;
use blog_database::repositories::post::PostRepository;
use blog_database::repositories::user::UserRepository;
use blog_entity::notification::model::Notification;
use blog_entity::user::model::User;

/// How many recent notifications the author dashboard shows.
const RECENT_NOTIFICATIONS: i64 = 5;

/// Aggregates shown on an author's dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorOverview {
    /// Published post count for this author.
    pub published_posts: i64,
    /// Draft post count for this author.
    pub draft_posts: i64,
    /// Comments received across the author's posts.
    pub comments_received: i64,
    /// Total unread notifications.
    pub unread_notifications: i64,
    /// The most recent unread notifications, newest first.
    pub recent_notifications: Vec<Notification>,
}

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOverview {
    /// Total registered users.
    pub total_users: i64,
    /// Total posts across all statuses.
    pub total_posts: i64,
    /// Total comments.
    pub total_comments: i64,
    /// Published post count.
    pub published_posts: i64,
    /// Draft post count.
    pub draft_posts: i64,
}

/// Read model over aggregate site activity.
#[derive(Debug, Clone)]
pub struct DashboardService {
    user_repo: Arc<UserRepository>,
    post_repo: Arc<PostRepository>,
    comment_repo: Arc<CommentRepository>,
    notification_repo: Arc<NotificationRepository>,
}

impl DashboardService {
    /// Create a new dashboard service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        post_repo: Arc<PostRepository>,
        comment_repo: Arc<CommentRepository>,
        notification_repo: Arc<NotificationRepository>,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            comment_repo,
            notification_repo,
        }
    }

    /// Aggregates for one author's dashboard.
    pub async fn author_overview(&self, author_id: Uuid) -> AppResult<AuthorOverview> {
        let counts = self.post_repo.count_by_status(Some(author_id)).await?;
        let comments_received = self.comment_repo.count_on_posts_of(author_id).await?;
        let unread_notifications = self.notification_repo.count_unread(author_id).await?;
        let recent_notifications = self
            .notification_repo
            .find_unread_by_user(author_id, RECENT_NOTIFICATIONS)
            .await?;

        Ok(AuthorOverview {
            published_posts: counts.published,
            draft_posts: counts.draft,
            comments_received,
            unread_notifications,
            recent_notifications,
        })
    }

    /// Site-wide aggregates. Admin only; the role check is explicit
    /// rather than tied to any particular identity.
    pub async fn admin_overview(&self, actor: &User) -> AppResult<AdminOverview> {
        if !actor.is_admin() {
            return Err(AppError::authorization("Access denied. Admin only."));
        }

        let total_users = self.user_repo.count().await?;
        let counts = self.post_repo.count_by_status(None).await?;
        let total_comments = self.comment_repo.count().await?;

        Ok(AdminOverview {
            total_users,
            total_posts: counts.total(),
            total_comments,
            published_posts: counts.published,
            draft_posts: counts.draft,
        })
    }
}
