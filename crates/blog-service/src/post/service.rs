//! Post authoring, mutation, and listing.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_core::types::pagination::{PageRequest, PageResponse};
use blog_database::repositories::post::PostRepository;
use blog_entity::job::payload::JobPayload;
use blog_entity::post::filter::PostFilter;
use blog_entity::post::model::{CreatePost, Post, PostCounts, UpdatePost};
use blog_entity::post::status::PostStatus;
use blog_entity::user::model::User;
use blog_worker::queue::JobQueue;

use super::slug::slugify;
use super::transition::is_publish_transition;

/// Manages post authoring and the publish transition.
#[derive(Clone)]
pub struct PostService {
    /// Post repository.
    post_repo: Arc<PostRepository>,
    /// Queue the publish transition enqueues into.
    queue: Arc<JobQueue>,
}

impl PostService {
    /// Create a new post service.
    pub fn new(post_repo: Arc<PostRepository>, queue: Arc<JobQueue>) -> Self {
        Self { post_repo, queue }
    }

    /// Fetch a post by ID.
    pub async fn get_post(&self, id: Uuid) -> AppResult<Post> {
        self.post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))
    }

    /// Fetch a post by slug.
    pub async fn get_post_by_slug(&self, slug: &str) -> AppResult<Post> {
        self.post_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post '{slug}' not found")))
    }

    /// Create a new post.
    ///
    /// A post created directly in the published state does not enter the
    /// notification pipeline; only a draft-to-published transition does.
    pub async fn create_post(&self, data: CreatePost) -> AppResult<Post> {
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let mut slug = slugify(&data.title);
        if self.post_repo.slug_exists(&slug).await? {
            let suffix = Uuid::new_v4().simple().to_string();
            slug = format!("{slug}-{}", &suffix[..8]);
        }

        self.post_repo.create(&data, &slug).await
    }

    /// Apply a partial update to a post owned by `actor`.
    ///
    /// The repository returns the pre-mutation status atomically with the
    /// updated row; that pair feeds the transition detector after the
    /// mutation has been persisted.
    pub async fn update_post(&self, actor: &User, id: Uuid, data: UpdatePost) -> AppResult<Post> {
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let existing = self.get_post(id).await?;
        if existing.user_id != actor.id {
            return Err(AppError::authorization(
                "Only the author may update this post",
            ));
        }

        let updated = self
            .post_repo
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))?;

        self.submit_transition(id, Some(updated.previous_status), updated.post.status)
            .await;

        Ok(updated.post)
    }

    /// Evaluate a persisted status change and enqueue the publish
    /// notification job on a draft-to-published transition.
    ///
    /// Enqueue failure is logged and swallowed: the content mutation has
    /// already committed and must stand regardless of queue health.
    /// Returns whether a job was enqueued.
    pub async fn submit_transition(
        &self,
        post_id: Uuid,
        previous_status: Option<PostStatus>,
        new_status: PostStatus,
    ) -> bool {
        if !is_publish_transition(previous_status, new_status) {
            return false;
        }

        match self.queue.enqueue(&JobPayload::PostPublished { post_id }).await {
            Ok(job) => {
                tracing::info!(%post_id, job_id = %job.id, "Publish transition enqueued");
                true
            }
            Err(e) => {
                tracing::error!(
                    %post_id,
                    error = %e,
                    "Failed to enqueue publish notification; the post mutation stands"
                );
                false
            }
        }
    }

    /// Delete a post owned by `actor`. Comments and notifications
    /// cascade at the storage layer.
    pub async fn delete_post(&self, actor: &User, id: Uuid) -> AppResult<()> {
        let existing = self.get_post(id).await?;
        if existing.user_id != actor.id && !actor.is_admin() {
            return Err(AppError::authorization(
                "Only the author may delete this post",
            ));
        }

        self.post_repo.delete(id).await?;
        Ok(())
    }

    /// List posts matching the filter, newest first, with pagination.
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Post>> {
        self.post_repo.list(filter, page).await
    }

    /// Count posts by status, globally or scoped to one author.
    pub async fn count_by_status(&self, owner: Option<Uuid>) -> AppResult<PostCounts> {
        self.post_repo.count_by_status(owner).await
    }
}
