//! Integration tests for the notification read model and dashboards.

use chrono::{Duration, Utc};

use blog_entity::notification::kind::NotificationKind;
use blog_entity::notification::model::CreateNotification;
use blog_entity::post::status::PostStatus;
use blog_entity::user::role::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_recent_unread_returns_five_newest_of_seven() {
    let app = TestApp::new().await;
    let reader = app.create_user("busy_reader", UserRole::Author).await;
    let post = app
        .create_post(&reader, "A much-discussed post", PostStatus::Published)
        .await;

    let base = Utc::now() - Duration::hours(7);
    for i in 0..7i64 {
        let created = app
            .notification_repo
            .create(&CreateNotification {
                user_id: reader.id,
                post_id: post.id,
                kind: NotificationKind::CommentAdded,
                message: format!("Comment number {i}"),
            })
            .await
            .unwrap()
            .expect("comment notifications are not deduplicated");
        app.backdate_notification(created.id, base + Duration::hours(i))
            .await;
    }

    assert_eq!(app.notifications.unread_count(reader.id).await.unwrap(), 7);

    let recent = app.notifications.recent_unread(reader.id, 5).await.unwrap();
    assert_eq!(recent.len(), 5);
    // Newest first: comments 6 down to 2.
    assert_eq!(recent[0].message, "Comment number 6");
    assert_eq!(recent[4].message, "Comment number 2");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_mark_read_is_recipient_scoped() {
    let app = TestApp::new().await;
    let owner = app.create_user("inbox_owner", UserRole::Author).await;
    let intruder = app.create_user("inbox_intruder", UserRole::Author).await;
    let post = app
        .create_post(&owner, "A private inbox", PostStatus::Published)
        .await;

    let notification = app
        .notification_repo
        .create(&CreateNotification {
            user_id: owner.id,
            post_id: post.id,
            kind: NotificationKind::PostPublished,
            message: "Your post 'A private inbox' has been published!".to_string(),
        })
        .await
        .unwrap()
        .unwrap();

    // Someone else cannot flip the flag.
    assert!(app
        .notifications
        .mark_read(intruder.id, notification.id)
        .await
        .is_err());
    assert_eq!(app.notifications.unread_count(owner.id).await.unwrap(), 1);

    app.notifications
        .mark_read(owner.id, notification.id)
        .await
        .unwrap();
    assert_eq!(app.notifications.unread_count(owner.id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_dashboards_aggregate_activity() {
    let app = TestApp::new().await;
    let admin = app.create_user("site_admin", UserRole::Admin).await;
    let author = app.create_user("dashboard_author", UserRole::Author).await;
    let reader = app.create_user("dashboard_reader", UserRole::Author).await;

    app.create_post(&author, "Dashboard draft", PostStatus::Draft).await;
    let published = app
        .create_post(&author, "Dashboard published", PostStatus::Published)
        .await;

    app.comments
        .add_comment(blog_entity::comment::model::CreateComment {
            user_id: reader.id,
            post_id: published.id,
            content: "Great write-up!".to_string(),
        })
        .await
        .unwrap();

    let overview = app.dashboard.author_overview(author.id).await.unwrap();
    assert_eq!(overview.draft_posts, 1);
    assert_eq!(overview.published_posts, 1);
    assert_eq!(overview.comments_received, 1);

    // The admin overview is gated on the role, not on any identity.
    assert!(app.dashboard.admin_overview(&author).await.is_err());

    let site = app.dashboard.admin_overview(&admin).await.unwrap();
    assert_eq!(site.total_users, 3);
    assert_eq!(site.total_posts, 2);
    assert_eq!(site.total_comments, 1);
    assert_eq!(site.published_posts, 1);
    assert_eq!(site.draft_posts, 1);
}
