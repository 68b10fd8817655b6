//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::status::PostStatus;

/// Number of characters shown in a body preview.
const PREVIEW_LENGTH: usize = 200;

/// An authored post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// The authoring user.
    pub user_id: Uuid,
    /// Post title.
    pub title: String,
    /// URL-friendly slug derived from the title.
    pub slug: String,
    /// Post body.
    pub body: String,
    /// Lifecycle status.
    pub status: PostStatus,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Check if the post is published.
    pub fn is_published(&self) -> bool {
        self.status.is_published()
    }

    /// Check if the post is a draft.
    pub fn is_draft(&self) -> bool {
        !self.status.is_published()
    }

    /// Body preview for listings, truncated to 200 characters.
    pub fn preview(&self) -> String {
        if self.body.chars().count() <= PREVIEW_LENGTH {
            return self.body.clone();
        }
        let cut: String = self.body.chars().take(PREVIEW_LENGTH - 3).collect();
        format!("{cut}...")
    }
}

/// Data required to create a new post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePost {
    /// The authoring user.
    pub user_id: Uuid,
    /// Post title.
    #[validate(length(min = 5, max = 200, message = "title must be 5-200 characters"))]
    pub title: String,
    /// Post body.
    #[validate(length(min = 10, message = "body must be at least 10 characters"))]
    pub body: String,
    /// Initial status.
    pub status: PostStatus,
}

/// Partial update to an existing post. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePost {
    /// New title.
    #[validate(length(min = 5, max = 200, message = "title must be 5-200 characters"))]
    pub title: Option<String>,
    /// New body.
    #[validate(length(min = 10, message = "body must be at least 10 characters"))]
    pub body: Option<String>,
    /// New status.
    pub status: Option<PostStatus>,
}

/// Post totals split by status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct PostCounts {
    /// Number of drafts.
    pub draft: i64,
    /// Number of published posts.
    pub published: i64,
}

impl PostCounts {
    /// Total number of posts.
    pub fn total(&self) -> i64 {
        self.draft + self.published
    }
}
