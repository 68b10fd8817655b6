//! Comment repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_entity::comment::model::{Comment, CreateComment};

/// Repository for comment CRUD operations.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find comment", e))
    }

    /// List comments on a post, newest first.
    pub async fn find_by_post(&self, post_id: Uuid) -> AppResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list comments", e))
    }

    /// Create a new comment.
    pub async fn create(&self, data: &CreateComment) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (user_id, post_id, content) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.post_id)
        .bind(&data.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create comment", e))
    }

    /// Delete a comment.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete comment", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all comments.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count comments", e))
    }

    /// Count comments written on a user's posts.
    pub async fn count_on_posts_of(&self, author_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments c \
             JOIN posts p ON p.id = c.post_id \
             WHERE p.user_id = $1",
        )
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count comments", e))
    }
}
