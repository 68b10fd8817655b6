//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A reader comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// The commenting user.
    pub user_id: Uuid,
    /// The post commented on.
    pub post_id: Uuid,
    /// Comment text.
    pub content: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new comment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateComment {
    /// The commenting user.
    pub user_id: Uuid,
    /// The post commented on.
    pub post_id: Uuid,
    /// Comment text.
    #[validate(length(min = 2, max = 1000, message = "content must be 2-1000 characters"))]
    pub content: String,
}
