//! Integration tests for the filtered, paginated post listing.

use chrono::{Duration, Utc};

use blog_core::types::pagination::PageRequest;
use blog_entity::post::filter::PostFilter;
use blog_entity::post::status::PostStatus;
use blog_entity::user::role::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_unfiltered_listing_is_paginated_newest_first() {
    let app = TestApp::new().await;
    let author = app.create_user("list_author", UserRole::Author).await;

    let base = Utc::now() - Duration::days(30);
    for i in 0..12i64 {
        let post = app
            .create_post(&author, &format!("Listing post {i:02}"), PostStatus::Draft)
            .await;
        app.backdate_post(post.id, base + Duration::hours(i)).await;
    }

    let page1 = app
        .posts
        .list_posts(&PostFilter::default(), &PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page1.items.len(), 10);
    assert_eq!(page1.total_count, 12);
    assert_eq!(page1.total_pages, 2);
    assert_eq!(page1.page, 1);
    // Newest first: the page starts at post 11 and descends.
    assert_eq!(page1.items[0].title, "Listing post 11");
    assert_eq!(page1.items[9].title, "Listing post 02");

    let page2 = app
        .posts
        .list_posts(&PostFilter::default(), &PageRequest::new(2, 10))
        .await
        .unwrap();
    assert_eq!(page2.items.len(), 2);
    assert_eq!(page2.items[0].title, "Listing post 01");
    assert_eq!(page2.items[1].title, "Listing post 00");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_date_range_is_inclusive_and_intersects_with_status() {
    let app = TestApp::new().await;
    let author = app.create_user("range_author", UserRole::Author).await;

    let d1 = Utc::now() - Duration::days(10);
    let d2 = Utc::now() - Duration::days(5);

    let before = app
        .create_post(&author, "Before the range", PostStatus::Published)
        .await;
    app.backdate_post(before.id, d1 - Duration::seconds(1)).await;

    let on_start = app
        .create_post(&author, "Exactly at range start", PostStatus::Published)
        .await;
    app.backdate_post(on_start.id, d1).await;

    let inside_draft = app
        .create_post(&author, "Inside but draft", PostStatus::Draft)
        .await;
    app.backdate_post(inside_draft.id, d1 + Duration::days(2)).await;

    let on_end = app
        .create_post(&author, "Exactly at range end", PostStatus::Published)
        .await;
    app.backdate_post(on_end.id, d2).await;

    let after = app
        .create_post(&author, "After the range", PostStatus::Published)
        .await;
    app.backdate_post(after.id, d2 + Duration::seconds(1)).await;

    let ranged = PostFilter::default().with_created_between(d1, d2);
    let result = app
        .posts
        .list_posts(&ranged, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(result.total_count, 3);
    let titles: Vec<_> = result.items.iter().map(|p| p.title.as_str()).collect();
    assert!(titles.contains(&"Exactly at range start"));
    assert!(titles.contains(&"Exactly at range end"));
    assert!(titles.contains(&"Inside but draft"));

    // Combining the range with a status filter returns the intersection.
    let ranged_published = PostFilter::default()
        .with_created_between(d1, d2)
        .with_status(PostStatus::Published);
    let result = app
        .posts
        .list_posts(&ranged_published, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(result.total_count, 2);
    assert!(result.items.iter().all(|p| p.is_published()));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_text_query_matches_title_or_body_case_insensitively() {
    let app = TestApp::new().await;
    let author = app.create_user("search_author", UserRole::Author).await;

    app.create_post(&author, "Fearless Concurrency", PostStatus::Published)
        .await;
    let in_body = app
        .posts
        .create_post(blog_entity::post::model::CreatePost {
            user_id: author.id,
            title: "An unrelated title".to_string(),
            body: "This body mentions CONCURRENCY in passing.".to_string(),
            status: PostStatus::Published,
        })
        .await
        .unwrap();
    app.create_post(&author, "Nothing to see here", PostStatus::Published)
        .await;

    let result = app
        .posts
        .list_posts(
            &PostFilter::default().with_query("concurrency"),
            &PageRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(result.total_count, 2);
    assert!(result.items.iter().any(|p| p.id == in_body.id));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database (set DATABASE_URL)"]
async fn test_owner_filter_and_status_counts() {
    let app = TestApp::new().await;
    let alice = app.create_user("count_alice", UserRole::Author).await;
    let bob = app.create_user("count_bob", UserRole::Author).await;

    app.create_post(&alice, "Alice draft one", PostStatus::Draft).await;
    app.create_post(&alice, "Alice draft two", PostStatus::Draft).await;
    app.create_post(&alice, "Alice published", PostStatus::Published)
        .await;
    app.create_post(&bob, "Bob published", PostStatus::Published).await;

    let only_alice = app
        .posts
        .list_posts(
            &PostFilter::default().with_author(alice.id),
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(only_alice.total_count, 3);
    assert!(only_alice.items.iter().all(|p| p.user_id == alice.id));

    let alice_counts = app.posts.count_by_status(Some(alice.id)).await.unwrap();
    assert_eq!(alice_counts.draft, 2);
    assert_eq!(alice_counts.published, 1);
    assert_eq!(alice_counts.total(), 3);

    let global = app.posts.count_by_status(None).await.unwrap();
    assert_eq!(global.draft, 2);
    assert_eq!(global.published, 2);
}
