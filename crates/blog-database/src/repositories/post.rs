//! Post repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_core::types::pagination::{PageRequest, PageResponse};
use blog_entity::post::filter::PostFilter;
use blog_entity::post::model::{CreatePost, Post, PostCounts, UpdatePost};
use blog_entity::post::status::PostStatus;

/// Optional-filter WHERE clause shared by the list and count queries.
/// A NULL bind leaves the corresponding constraint inactive.
const FILTER_WHERE: &str = "($1::post_status IS NULL OR status = $1) \
     AND ($2::uuid IS NULL OR user_id = $2) \
     AND ($3::text IS NULL OR (title ILIKE '%' || $3 || '%' OR body ILIKE '%' || $3 || '%')) \
     AND ($4::timestamptz IS NULL OR created_at >= $4) \
     AND ($5::timestamptz IS NULL OR created_at <= $5)";

/// Result of an atomic post update: the new row together with the status
/// it held immediately before the mutation.
#[derive(Debug, Clone)]
pub struct UpdatedPost {
    /// The post after the update.
    pub post: Post,
    /// The status before the update.
    pub previous_status: PostStatus,
}

#[derive(FromRow)]
struct UpdatedPostRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    slug: String,
    body: String,
    status: PostStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    previous_status: PostStatus,
}

impl From<UpdatedPostRow> for UpdatedPost {
    fn from(row: UpdatedPostRow) -> Self {
        Self {
            post: Post {
                id: row.id,
                user_id: row.user_id,
                title: row.title,
                slug: row.slug,
                body: row.body,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            previous_status: row.previous_status,
        }
    }
}

/// Repository for post CRUD and listing operations.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post", e))
    }

    /// Find a post by its slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post by slug", e))
    }

    /// Check whether a slug is already taken.
    pub async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check slug", e))
    }

    /// Create a new post.
    pub async fn create(&self, data: &CreatePost, slug: &str) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (user_id, title, slug, body, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.title)
        .bind(slug)
        .bind(&data.body)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create post", e))
    }

    /// Apply a partial update and return the new row together with the
    /// pre-mutation status, captured in the same statement. The row lock
    /// taken by the inner SELECT keeps the before/after pair consistent
    /// under concurrent writers.
    pub async fn update(&self, id: Uuid, data: &UpdatePost) -> AppResult<Option<UpdatedPost>> {
        let row = sqlx::query_as::<_, UpdatedPostRow>(
            "UPDATE posts SET \
                title = COALESCE($2, title), \
                body = COALESCE($3, body), \
                status = COALESCE($4, status), \
                updated_at = NOW() \
             FROM (SELECT id, status AS previous_status FROM posts WHERE id = $1 FOR UPDATE) prev \
             WHERE posts.id = prev.id \
             RETURNING posts.id, posts.user_id, posts.title, posts.slug, posts.body, \
                       posts.status, posts.created_at, posts.updated_at, prev.previous_status",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.body)
        .bind(data.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update post", e))?;

        Ok(row.map(UpdatedPost::from))
    }

    /// Delete a post. Dependent comments and notifications cascade.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete post", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// List posts matching the filter, newest first, with pagination.
    pub async fn list(
        &self,
        filter: &PostFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Post>> {
        let count_sql = format!("SELECT COUNT(*) FROM posts WHERE {FILTER_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.status)
            .bind(filter.author_id)
            .bind(&filter.query)
            .bind(filter.created_from)
            .bind(filter.created_to)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count posts", e))?;

        let list_sql = format!(
            "SELECT * FROM posts WHERE {FILTER_WHERE} \
             ORDER BY created_at DESC LIMIT $6 OFFSET $7"
        );
        let posts = sqlx::query_as::<_, Post>(&list_sql)
            .bind(filter.status)
            .bind(filter.author_id)
            .bind(&filter.query)
            .bind(filter.created_from)
            .bind(filter.created_to)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list posts", e))?;

        Ok(PageResponse::new(
            posts,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count posts by status, globally or scoped to one author.
    pub async fn count_by_status(&self, owner: Option<Uuid>) -> AppResult<PostCounts> {
        sqlx::query_as::<_, PostCounts>(
            "SELECT COUNT(*) FILTER (WHERE status = 'draft') AS draft, \
                    COUNT(*) FILTER (WHERE status = 'published') AS published \
             FROM posts WHERE ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count posts", e))
    }
}
