//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use blog_core::config::worker::WorkerConfig;
use blog_database::repositories::{
    CommentRepository, JobRepository, NotificationRepository, PostRepository, UserRepository,
};
use blog_entity::job::model::Job;
use blog_entity::notification::model::Notification;
use blog_entity::post::model::{CreatePost, Post};
use blog_entity::post::status::PostStatus;
use blog_entity::user::model::{CreateUser, User};
use blog_entity::user::role::UserRole;
use blog_mailer::MockMailer;
use blog_service::{CommentService, DashboardService, NotificationService, PostService};
use blog_worker::executor::JobExecutor;
use blog_worker::jobs::{PostPublishedHandler, QueueMaintenanceHandler};
use blog_worker::JobQueue;

/// Test application context wired against the test database.
pub struct TestApp {
    /// Database pool for direct queries.
    pub pool: PgPool,
    pub post_repo: Arc<PostRepository>,
    pub user_repo: Arc<UserRepository>,
    pub comment_repo: Arc<CommentRepository>,
    pub notification_repo: Arc<NotificationRepository>,
    pub job_repo: Arc<JobRepository>,
    pub queue: Arc<JobQueue>,
    pub mailer: Arc<MockMailer>,
    pub executor: JobExecutor,
    pub posts: PostService,
    pub comments: CommentService,
    pub notifications: NotificationService,
    pub dashboard: DashboardService,
}

impl TestApp {
    /// Connect, migrate, and truncate all tables.
    pub async fn new() -> Self {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost:5432/miniblog_test".to_string());

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .expect("Failed to connect to test database");

        blog_database::migration::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        sqlx::query("TRUNCATE users, posts, comments, notifications, jobs CASCADE")
            .execute(&pool)
            .await
            .expect("Failed to clean test database");

        let post_repo = Arc::new(PostRepository::new(pool.clone()));
        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let comment_repo = Arc::new(CommentRepository::new(pool.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(pool.clone()));
        let job_repo = Arc::new(JobRepository::new(pool.clone()));

        // Zero visibility timeout so a claimed-but-unacknowledged job is
        // immediately claimable again, which is how the tests simulate
        // redelivery.
        let config = WorkerConfig {
            enabled: true,
            concurrency: 1,
            poll_interval_seconds: 1,
            visibility_timeout_seconds: 0,
            max_attempts: 3,
            completed_retention_days: 7,
        };

        let queue = Arc::new(JobQueue::new(
            Arc::clone(&job_repo),
            "test-worker".to_string(),
            &config,
        ));

        let mailer = Arc::new(MockMailer::new());

        let mut executor = JobExecutor::new();
        executor.register(Arc::new(PostPublishedHandler::new(
            Arc::clone(&post_repo),
            Arc::clone(&user_repo),
            Arc::clone(&notification_repo),
            Arc::clone(&mailer) as Arc<dyn blog_mailer::Mailer>,
            Duration::from_secs(2),
        )));
        executor.register(Arc::new(QueueMaintenanceHandler::new(
            Arc::clone(&job_repo),
            config.visibility_timeout_seconds,
            config.completed_retention_days,
        )));

        let posts = PostService::new(Arc::clone(&post_repo), Arc::clone(&queue));
        let comments = CommentService::new(Arc::clone(&comment_repo), Arc::clone(&post_repo));
        let notifications = NotificationService::new(Arc::clone(&notification_repo));
        let dashboard = DashboardService::new(
            Arc::clone(&user_repo),
            Arc::clone(&post_repo),
            Arc::clone(&comment_repo),
            Arc::clone(&notification_repo),
        );

        Self {
            pool,
            post_repo,
            user_repo,
            comment_repo,
            notification_repo,
            job_repo,
            queue,
            mailer,
            executor,
            posts,
            comments,
            notifications,
            dashboard,
        }
    }

    /// Create a user with a derived email address.
    pub async fn create_user(&self, username: &str, role: UserRole) -> User {
        self.user_repo
            .create(&CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                role,
            })
            .await
            .expect("Failed to create test user")
    }

    /// Create a post through the service (so slugs and validation apply).
    pub async fn create_post(&self, author: &User, title: &str, status: PostStatus) -> Post {
        self.posts
            .create_post(CreatePost {
                user_id: author.id,
                title: title.to_string(),
                body: format!("Body for {title}, long enough to validate."),
                status,
            })
            .await
            .expect("Failed to create test post")
    }

    /// Rewrite a post's creation timestamp, for date-filter tests.
    pub async fn backdate_post(&self, post_id: Uuid, created_at: DateTime<Utc>) {
        sqlx::query("UPDATE posts SET created_at = $2 WHERE id = $1")
            .bind(post_id)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .expect("Failed to backdate post");
    }

    /// Rewrite a notification's creation timestamp.
    pub async fn backdate_notification(&self, notification_id: Uuid, created_at: DateTime<Utc>) {
        sqlx::query("UPDATE notifications SET created_at = $2 WHERE id = $1")
            .bind(notification_id)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .expect("Failed to backdate notification");
    }

    /// Total number of job rows, any status.
    pub async fn total_jobs(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count jobs")
    }

    /// Claim the next job from the default queue.
    pub async fn claim_one(&self) -> Option<Job> {
        self.queue
            .claim(&["default"])
            .await
            .expect("Failed to claim job")
    }

    /// All notifications attached to a post.
    pub async fn notifications_for_post(&self, post_id: Uuid) -> Vec<Notification> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE post_id = $1 ORDER BY created_at",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .expect("Failed to list notifications")
    }
}
