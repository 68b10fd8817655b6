//! Integration tests for the publish-notification pipeline.

use std::sync::Arc;
use std::time::Duration;

use blog_entity::job::status::JobStatus;
use blog_entity::notification::kind::NotificationKind;
use blog_entity::post::model::UpdatePost;
use blog_entity::post::status::PostStatus;
use blog_entity::user::role::UserRole;
use blog_mailer::{Mailer, MockMailer};
use blog_worker::jobs::PostPublishedHandler;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_publish_transition_enqueues_exactly_one_job() {
    let app = TestApp::new().await;
    let author = app.create_user("pub_author", UserRole::Author).await;
    let post = app
        .create_post(&author, "A freshly drafted post", PostStatus::Draft)
        .await;
    assert_eq!(app.total_jobs().await, 0);

    app.posts
        .update_post(
            &author,
            post.id,
            UpdatePost {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(app.total_jobs().await, 1);
    assert_eq!(app.job_repo.count_by_status(JobStatus::Pending).await.unwrap(), 1);

    // A second update that leaves the status published enqueues nothing.
    app.posts
        .update_post(
            &author,
            post.id,
            UpdatePost {
                title: Some("A fresh title, still published".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(app.total_jobs().await, 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_other_transitions_enqueue_nothing() {
    let app = TestApp::new().await;
    let author = app.create_user("quiet_author", UserRole::Author).await;

    // Created directly in the published state: an initial state, not a
    // transition.
    app.create_post(&author, "Born published", PostStatus::Published)
        .await;
    assert_eq!(app.total_jobs().await, 0);

    // Draft-to-draft no-op update.
    let draft = app
        .create_post(&author, "Still a draft", PostStatus::Draft)
        .await;
    app.posts
        .update_post(
            &author,
            draft.id,
            UpdatePost {
                body: Some("An edited draft body, long enough.".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(app.total_jobs().await, 0);

    // Unpublishing enqueues nothing either.
    let published = app
        .create_post(&author, "Published then pulled", PostStatus::Draft)
        .await;
    app.posts
        .update_post(
            &author,
            published.id,
            UpdatePost {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    app.posts
        .update_post(
            &author,
            published.id,
            UpdatePost {
                status: Some(PostStatus::Draft),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(app.total_jobs().await, 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_dispatch_creates_single_unread_notification_and_alert() {
    let app = TestApp::new().await;
    let author = app.create_user("notified_author", UserRole::Author).await;
    let post = app
        .create_post(&author, "The big announcement", PostStatus::Draft)
        .await;

    app.posts
        .update_post(
            &author,
            post.id,
            UpdatePost {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let job = app.claim_one().await.expect("expected a pending job");
    let result = app.executor.execute(&job).await.unwrap();
    app.queue.complete(job.id, result).await.unwrap();

    let notifications = app.notifications_for_post(post.id).await;
    assert_eq!(notifications.len(), 1);
    let notification = &notifications[0];
    assert_eq!(notification.user_id, author.id);
    assert_eq!(notification.kind, NotificationKind::PostPublished);
    assert!(notification.is_unread());
    assert_eq!(
        notification.message,
        "Your post 'The big announcement' has been published!"
    );

    assert!(app.mailer.was_sent_to("notified_author@example.com").await);
    assert_eq!(app.job_repo.count_by_status(JobStatus::Completed).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_redelivered_job_never_creates_second_notification() {
    let app = TestApp::new().await;
    let author = app.create_user("redelivery_author", UserRole::Author).await;
    let post = app
        .create_post(&author, "Delivered twice", PostStatus::Draft)
        .await;

    app.posts
        .update_post(
            &author,
            post.id,
            UpdatePost {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // First delivery processes but is never acknowledged, as if the
    // worker crashed after the insert.
    let first = app.claim_one().await.expect("expected a pending job");
    app.executor.execute(&first).await.unwrap();

    // The zero visibility timeout makes the job claimable again at once:
    // a second worker receives the same job.
    let second = app.claim_one().await.expect("expected a redelivered job");
    assert_eq!(second.id, first.id);
    assert_eq!(second.attempts, 2);

    let result = app.executor.execute(&second).await.unwrap();
    assert_eq!(result.unwrap()["outcome"], "duplicate");
    app.queue.complete(second.id, None).await.unwrap();

    assert_eq!(app.notifications_for_post(post.id).await.len(), 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_stale_job_acks_when_post_deleted() {
    let app = TestApp::new().await;
    let author = app.create_user("deleting_author", UserRole::Author).await;
    let post = app
        .create_post(&author, "Here and gone", PostStatus::Draft)
        .await;

    app.posts
        .update_post(
            &author,
            post.id,
            UpdatePost {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // The post disappears between enqueue and dispatch.
    app.posts.delete_post(&author, post.id).await.unwrap();

    let job = app.claim_one().await.expect("expected a pending job");
    let result = app.executor.execute(&job).await.unwrap();
    assert_eq!(result.unwrap()["outcome"], "post_missing");
    app.queue.complete(job.id, None).await.unwrap();

    assert_eq!(app.notifications_for_post(post.id).await.len(), 0);
    assert_eq!(app.mailer.sent_count().await, 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_unpublished_between_enqueue_and_dispatch_is_a_no_op() {
    let app = TestApp::new().await;
    let author = app.create_user("flaky_author", UserRole::Author).await;
    let post = app
        .create_post(&author, "Second thoughts", PostStatus::Draft)
        .await;

    app.posts
        .update_post(
            &author,
            post.id,
            UpdatePost {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    app.posts
        .update_post(
            &author,
            post.id,
            UpdatePost {
                status: Some(PostStatus::Draft),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let job = app.claim_one().await.expect("expected a pending job");
    let result = app.executor.execute(&job).await.unwrap();
    assert_eq!(result.unwrap()["outcome"], "not_published");

    assert_eq!(app.notifications_for_post(post.id).await.len(), 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_alert_failure_keeps_notification_and_job_success() {
    let app = TestApp::new().await;
    let author = app.create_user("unreachable_author", UserRole::Author).await;
    let post = app
        .create_post(&author, "Mail is down", PostStatus::Draft)
        .await;

    app.posts
        .update_post(
            &author,
            post.id,
            UpdatePost {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // A dispatcher whose mailer always fails.
    let handler = PostPublishedHandler::new(
        Arc::clone(&app.post_repo),
        Arc::clone(&app.user_repo),
        Arc::clone(&app.notification_repo),
        Arc::new(MockMailer::failing()) as Arc<dyn Mailer>,
        Duration::from_secs(2),
    );

    let job = app.claim_one().await.expect("expected a pending job");
    let result = blog_worker::executor::JobHandler::execute(&handler, &job)
        .await
        .unwrap();
    assert_eq!(result.unwrap()["outcome"], "notified");

    assert_eq!(app.notifications_for_post(post.id).await.len(), 1);
}
