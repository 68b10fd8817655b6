//! Comment creation and listing.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_database::repositories::comment::CommentRepository;
use blog_database::repositories::post::PostRepository;
use blog_entity::comment::model::{Comment, CreateComment};
use blog_entity::user::model::User;

/// Manages reader comments on posts.
#[derive(Debug, Clone)]
pub struct CommentService {
    /// Comment repository.
    comment_repo: Arc<CommentRepository>,
    /// Post repository, for existence checks.
    post_repo: Arc<PostRepository>,
}

impl CommentService {
    /// Create a new comment service.
    pub fn new(comment_repo: Arc<CommentRepository>, post_repo: Arc<PostRepository>) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    /// Add a comment to an existing post.
    pub async fn add_comment(&self, data: CreateComment) -> AppResult<Comment> {
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        if self.post_repo.find_by_id(data.post_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Post {} not found",
                data.post_id
            )));
        }

        self.comment_repo.create(&data).await
    }

    /// List comments on a post, newest first.
    pub async fn list_for_post(&self, post_id: Uuid) -> AppResult<Vec<Comment>> {
        self.comment_repo.find_by_post(post_id).await
    }

    /// Delete a comment. Allowed for the comment's author and admins.
    pub async fn delete_comment(&self, actor: &User, comment_id: Uuid) -> AppResult<()> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Comment {comment_id} not found")))?;

        if comment.user_id != actor.id && !actor.is_admin() {
            return Err(AppError::authorization(
                "Only the comment author may delete this comment",
            ));
        }

        self.comment_repo.delete(comment_id).await?;
        Ok(())
    }
}
