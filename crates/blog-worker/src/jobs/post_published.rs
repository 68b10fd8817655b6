//! Publish-notification dispatcher.
//!
//! Consumes `post_published` jobs: re-fetches the post, records one
//! notification for the author, and sends a best-effort email alert.
//! Every guard in here exists so that at-least-once delivery stays safe:
//! stale and duplicate jobs acknowledge as no-ops instead of failing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use blog_database::repositories::notification::NotificationRepository;
use blog_database::repositories::post::PostRepository;
use blog_database::repositories::user::UserRepository;
use blog_entity::job::model::Job;
use blog_entity::job::payload::JobPayload;
use blog_entity::notification::kind::NotificationKind;
use blog_entity::notification::model::CreateNotification;
use blog_mailer::Mailer;

use crate::executor::{JobExecutionError, JobHandler};

/// Subject line for the publish alert email.
const ALERT_SUBJECT: &str = "Your post has been published";

/// Handles `post_published` jobs.
pub struct PostPublishedHandler {
    /// Post repository, for the fresh re-fetch.
    post_repo: Arc<PostRepository>,
    /// User repository, for the recipient contact.
    user_repo: Arc<UserRepository>,
    /// Notification repository.
    notification_repo: Arc<NotificationRepository>,
    /// Outbound delivery collaborator.
    mailer: Arc<dyn Mailer>,
    /// Bound on the outbound send so a hung relay cannot starve the pool.
    send_timeout: Duration,
}

impl PostPublishedHandler {
    /// Create a new publish-notification handler.
    pub fn new(
        post_repo: Arc<PostRepository>,
        user_repo: Arc<UserRepository>,
        notification_repo: Arc<NotificationRepository>,
        mailer: Arc<dyn Mailer>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            notification_repo,
            mailer,
            send_timeout,
        }
    }

    /// Best-effort alert delivery. Failure and timeout are logged, never
    /// propagated: the notification record already stands, and retrying
    /// through job redelivery would duplicate work, not mail.
    async fn send_alert(&self, recipient: &str, message: &str, post_id: Uuid) {
        let send = self.mailer.send_alert(recipient, ALERT_SUBJECT, message);
        match tokio::time::timeout(self.send_timeout, send).await {
            Ok(Ok(())) => {
                tracing::info!(%post_id, recipient, "Publish alert delivered");
            }
            Ok(Err(e)) => {
                tracing::warn!(%post_id, recipient, error = %e, "Publish alert delivery failed");
            }
            Err(_) => {
                tracing::warn!(
                    %post_id,
                    recipient,
                    timeout_secs = self.send_timeout.as_secs(),
                    "Publish alert delivery timed out"
                );
            }
        }
    }
}

/// The notification message for a published post.
pub fn publish_message(title: &str) -> String {
    format!("Your post '{title}' has been published!")
}

#[async_trait]
impl JobHandler for PostPublishedHandler {
    fn job_type(&self) -> &'static str {
        "post_published"
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let payload: JobPayload = serde_json::from_value(job.payload.clone())
            .map_err(|e| JobExecutionError::Permanent(format!("Malformed job payload: {e}")))?;

        let JobPayload::PostPublished { post_id } = payload else {
            return Err(JobExecutionError::Permanent(format!(
                "Payload does not match job type '{}'",
                job.job_type
            )));
        };

        // Re-fetch current state; the payload carries only the identifier
        // and the post may have changed since enqueue.
        let Some(post) = self.post_repo.find_by_id(post_id).await? else {
            tracing::info!(%post_id, "Post no longer exists, acknowledging as no-op");
            return Ok(Some(json!({"outcome": "post_missing"})));
        };

        if !post.is_published() {
            tracing::info!(%post_id, status = %post.status, "Post no longer published, acknowledging as no-op");
            return Ok(Some(json!({"outcome": "not_published"})));
        }

        let Some(author) = self.user_repo.find_by_id(post.user_id).await? else {
            tracing::info!(%post_id, "Author no longer exists, acknowledging as no-op");
            return Ok(Some(json!({"outcome": "author_missing"})));
        };

        let message = publish_message(&post.title);
        let created = self
            .notification_repo
            .create(&CreateNotification {
                user_id: author.id,
                post_id: post.id,
                kind: NotificationKind::PostPublished,
                message: message.clone(),
            })
            .await?;

        let Some(notification) = created else {
            // The unique index already holds a publish notification for
            // this post: a redelivered duplicate.
            tracing::info!(%post_id, "Notification already exists, acknowledging duplicate delivery");
            return Ok(Some(json!({"outcome": "duplicate"})));
        };

        self.send_alert(&author.email, &message, post.id).await;

        Ok(Some(json!({
            "outcome": "notified",
            "notification_id": notification.id,
            "recipient": author.id,
        })))
    }
}
