//! Integration tests: posting, listings, follow edges, and comments.
//!
//! Exercises the service layer against a real database:
//! - Post creation stores trimmed text and rejects blank submissions
//! - Listings page at 10 items and never leak across groups
//! - Single-post lookup requires the exact (author, id) pair
//! - Follow/unfollow is idempotent and drives the timeline feed
//! - Only the author can edit a post

mod common;

use blog_service::db::{follow_repo, post_repo};
use blog_service::error::AppError;
use blog_service::pagination::PAGE_SIZE;
use blog_service::services::{CommentService, FollowService, PostService};
use common::{create_group, create_user, setup_test_db};
use uuid::Uuid;

#[tokio::test]
async fn creating_a_post_stores_trimmed_text_and_increments_count() {
    let pool = setup_test_db().await.expect("db setup failed");
    let author = create_user(&pool, "poet").await;
    let service = PostService::new(pool.clone());

    let before = post_repo::count_posts(&pool).await.unwrap();
    let post = service
        .create_post(author, "  first entry  ", None, None)
        .await
        .unwrap();

    assert_eq!(post.text, "first entry");
    assert_eq!(post.author_id, author);
    assert_eq!(post_repo::count_posts(&pool).await.unwrap(), before + 1);

    // Blank and whitespace-only text never reach the store.
    for text in ["", "   \n\t "] {
        match service.create_post(author, text, None, None).await {
            Err(AppError::Validation(_)) => {}
            other => panic!("expected validation failure, got {other:?}"),
        }
    }
    assert_eq!(post_repo::count_posts(&pool).await.unwrap(), before + 1);

    // An unknown group reference is a validation failure, not a 500.
    match service
        .create_post(author, "tagged", Some(Uuid::new_v4()), None)
        .await
    {
        Err(AppError::Validation(_)) => {}
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn listing_pages_cap_at_ten_items() {
    let pool = setup_test_db().await.expect("db setup failed");
    let author = create_user(&pool, "prolific").await;
    let service = PostService::new(pool.clone());

    for i in 0..13 {
        service
            .create_post(author, &format!("entry {i}"), None, None)
            .await
            .unwrap();
    }

    let first = service.home_page(None).await.unwrap();
    assert_eq!(first.items.len(), PAGE_SIZE as usize);
    assert_eq!(first.total_count, 13);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next);
    assert!(!first.has_previous);

    let second = service.home_page(Some(2)).await.unwrap();
    assert_eq!(second.items.len(), 3);
    assert!(second.has_previous);

    // Past-the-end requests clamp to the last page.
    let clamped = service.home_page(Some(99)).await.unwrap();
    assert_eq!(clamped.number, 2);
    assert_eq!(clamped.items.len(), 3);
}

#[tokio::test]
async fn group_listings_do_not_leak_across_groups() {
    let pool = setup_test_db().await.expect("db setup failed");
    let author = create_user(&pool, "poet").await;
    let cats = create_group(&pool, "Cats", "cats").await;
    let dogs = create_group(&pool, "Dogs", "dogs").await;
    let service = PostService::new(pool.clone());

    service
        .create_post(author, "meow", Some(cats), None)
        .await
        .unwrap();
    service
        .create_post(author, "woof", Some(dogs), None)
        .await
        .unwrap();
    service
        .create_post(author, "untagged", None, None)
        .await
        .unwrap();

    let view = service.group_page("cats", None).await.unwrap();
    assert_eq!(view.group.slug, "cats");
    assert_eq!(view.page.items.len(), 1);
    assert_eq!(view.page.items[0].text, "meow");
    assert_eq!(view.page.items[0].group_slug.as_deref(), Some("cats"));

    match service.group_page("birds", None).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
    match service.profile_page("ghost", None, None).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn post_lookup_requires_the_exact_author_and_id_pair() {
    let pool = setup_test_db().await.expect("db setup failed");
    let poet = create_user(&pool, "poet").await;
    create_user(&pool, "bystander").await;
    let service = PostService::new(pool.clone());

    let post = service.create_post(poet, "mine", None, None).await.unwrap();

    let view = service.post_page("poet", post.id, None).await.unwrap();
    assert_eq!(view.post.text, "mine");
    assert_eq!(view.post_count, 1);
    assert!(!view.following);

    match service.post_page("bystander", post.id, None).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
    match service.post_page("poet", Uuid::new_v4(), None).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn follow_then_unfollow_restores_zero_edges() {
    let pool = setup_test_db().await.expect("db setup failed");
    let reader = create_user(&pool, "reader").await;
    let poet = create_user(&pool, "poet").await;
    let service = FollowService::new(pool.clone());

    service.follow(reader, "poet").await.unwrap();
    // A second follow of the same author is a silent no-op.
    service.follow(reader, "poet").await.unwrap();
    assert_eq!(follow_repo::count_followers(&pool, poet).await.unwrap(), 1);
    assert!(follow_repo::is_following(&pool, reader, poet)
        .await
        .unwrap());

    // Self-follow never creates an edge.
    service.follow(poet, "poet").await.unwrap();
    assert_eq!(follow_repo::count_following(&pool, poet).await.unwrap(), 0);

    service.unfollow(reader, "poet").await.unwrap();
    // Unfollowing again stays a no-op.
    service.unfollow(reader, "poet").await.unwrap();
    assert_eq!(follow_repo::count_followers(&pool, poet).await.unwrap(), 0);

    match service.follow(reader, "ghost").await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn timeline_feed_contains_only_followed_authors() {
    let pool = setup_test_db().await.expect("db setup failed");
    let follower = create_user(&pool, "follower").await;
    let stranger = create_user(&pool, "stranger").await;
    let poet = create_user(&pool, "poet").await;

    let posts = PostService::new(pool.clone());
    let follows = FollowService::new(pool.clone());

    follows.follow(follower, "poet").await.unwrap();

    let empty = follows.feed_page(follower, None).await.unwrap();
    assert!(empty.items.is_empty());

    posts.create_post(poet, "fresh work", None, None).await.unwrap();

    let feed = follows.feed_page(follower, None).await.unwrap();
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].text, "fresh work");
    assert_eq!(feed.items[0].author_username, "poet");

    let other_feed = follows.feed_page(stranger, None).await.unwrap();
    assert!(other_feed.items.is_empty());
}

#[tokio::test]
async fn only_the_author_can_update_a_post() {
    let pool = setup_test_db().await.expect("db setup failed");
    let poet = create_user(&pool, "poet").await;
    let rival = create_user(&pool, "rival").await;
    let service = PostService::new(pool.clone());

    let post = service
        .create_post(poet, "original", None, None)
        .await
        .unwrap();

    match service
        .update_post(rival, "poet", post.id, "vandalized", None, None)
        .await
    {
        Err(AppError::PermissionDenied(_)) => {}
        other => panic!("expected permission denied, got {other:?}"),
    }
    let unchanged = service.post_page("poet", post.id, None).await.unwrap();
    assert_eq!(unchanged.post.text, "original");

    service
        .update_post(poet, "poet", post.id, "revised", None, None)
        .await
        .unwrap();
    let revised = service.post_page("poet", post.id, None).await.unwrap();
    assert_eq!(revised.post.text, "revised");
    // Creation timestamp survives the edit.
    assert_eq!(revised.post.created_at, unchanged.post.created_at);
}

#[tokio::test]
async fn comments_require_an_existing_post_and_text() {
    let pool = setup_test_db().await.expect("db setup failed");
    let poet = create_user(&pool, "poet").await;
    let reader = create_user(&pool, "reader").await;

    let posts = PostService::new(pool.clone());
    let comments = CommentService::new(pool.clone());

    let post = posts.create_post(poet, "discuss", None, None).await.unwrap();

    match comments
        .add_comment(reader, "poet", Uuid::new_v4(), "into the void")
        .await
    {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
    match comments.add_comment(reader, "poet", post.id, "   ").await {
        Err(AppError::Validation(_)) => {}
        other => panic!("expected validation failure, got {other:?}"),
    }

    comments
        .add_comment(reader, "poet", post.id, "  well said  ")
        .await
        .unwrap();

    let view = posts.post_page("poet", post.id, None).await.unwrap();
    assert_eq!(view.comments.len(), 1);
    assert_eq!(view.comments[0].text, "well said");
    assert_eq!(view.comments[0].author_username, "reader");
}
