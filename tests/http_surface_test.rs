//! Integration tests: HTTP surface.
//!
//! Drives the actix app end to end against a real database:
//! - Home-feed page caching (byte-identical within the window)
//! - Login redirects for anonymous requests
//! - Author-only editing surfaced as a redirect
//! - Follow/unfollow redirects and 404s for unknown resources

mod common;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use blog_service::cache::PageCache;
use blog_service::config::{AppConfig, AuthConfig, CacheConfig, Config, DatabaseConfig};
use blog_service::handlers;
use blog_service::middleware::SessionAuth;

use common::{create_expired_session, create_session, create_user, setup_test_db};

fn test_config() -> Config {
    Config {
        app: AppConfig {
            env: "test".into(),
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
        },
        cache: CacheConfig { home_ttl_secs: 20 },
        auth: AuthConfig {
            login_url: "/auth/login/".into(),
        },
    }
}

macro_rules! test_app {
    ($pool:expr, $ttl:expr) => {
        test::init_service(
            App::new()
                .wrap(SessionAuth::new($pool.clone()))
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new(PageCache::new($ttl)))
                .app_data(web::Data::new(test_config()))
                .configure(handlers::configure)
                .default_service(web::route().to(handlers::not_found)),
        )
        .await
    };
}

async fn insert_post(pool: &PgPool, author_id: Uuid, text: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO posts (author_id, text) VALUES ($1, $2) RETURNING id",
    )
    .bind(author_id)
    .bind(text)
    .fetch_one(pool)
    .await
    .expect("failed to insert post")
}

fn location(resp: &actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn home_feed_is_byte_identical_within_the_cache_window() {
    let pool = setup_test_db().await.expect("db setup failed");
    let poet = create_user(&pool, "poet").await;
    let app = test_app!(pool, Duration::from_millis(400));

    insert_post(&pool, poet, "early entry").await;

    let first = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(String::from_utf8_lossy(&first).contains("early entry"));

    insert_post(&pool, poet, "late arrival").await;

    // Still inside the window: the stale bytes are served verbatim.
    let second =
        test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(first, second);

    // Paginated requests bypass the single cached entry.
    let paginated =
        test::call_and_read_body(&app, test::TestRequest::get().uri("/?page=1").to_request())
            .await;
    assert!(String::from_utf8_lossy(&paginated).contains("late arrival"));

    tokio::time::sleep(Duration::from_millis(500)).await;

    let third =
        test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(String::from_utf8_lossy(&third).contains("late arrival"));
}

#[tokio::test]
async fn anonymous_requests_to_protected_routes_redirect_to_login() {
    let pool = setup_test_db().await.expect("db setup failed");
    let app = test_app!(pool, Duration::from_secs(20));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new")
            .set_form([("text", "hello")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=%2Fnew");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/follow/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/auth/login/?next="));
}

#[tokio::test]
async fn authenticated_author_can_publish() {
    let pool = setup_test_db().await.expect("db setup failed");
    let poet = create_user(&pool, "poet").await;
    create_session(&pool, poet, "poet-token").await;

    let ghost = create_user(&pool, "ghost").await;
    create_expired_session(&pool, ghost, "ghost-token").await;

    let app = test_app!(pool, Duration::from_secs(20));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new")
            .cookie(Cookie::new("session", "poet-token"))
            .set_form([("text", "published over http")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // An expired session is as good as no session.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/new")
            .cookie(Cookie::new("session", "ghost-token"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/auth/login/?next="));
}

#[tokio::test]
async fn unknown_resources_return_404() {
    let pool = setup_test_db().await.expect("db setup failed");
    let poet = create_user(&pool, "poet").await;
    let app = test_app!(pool, Duration::from_secs(20));

    for uri in [
        "/group/missing/",
        "/nobody/",
        &format!("/poet/{}/", Uuid::new_v4()),
        "/poet/not-a-uuid/",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "uri {uri}");
    }

    // The author's own posts still resolve.
    let post_id = insert_post(&pool, poet, "findable").await;
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/poet/{post_id}/"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_author_edit_redirects_and_preserves_content() {
    let pool = setup_test_db().await.expect("db setup failed");
    let poet = create_user(&pool, "poet").await;
    let rival = create_user(&pool, "rival").await;
    create_session(&pool, rival, "rival-token").await;

    let post_id = insert_post(&pool, poet, "original").await;
    let app = test_app!(pool, Duration::from_secs(20));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/poet/{post_id}/edit/"))
            .cookie(Cookie::new("session", "rival-token"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/poet/{post_id}/"));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/poet/{post_id}/edit/"))
            .cookie(Cookie::new("session", "rival-token"))
            .set_form([("text", "hijacked")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/poet/{post_id}/"));

    let text: String = sqlx::query_scalar("SELECT text FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(text, "original");
}

#[tokio::test]
async fn follow_routes_redirect_to_the_profile() {
    let pool = setup_test_db().await.expect("db setup failed");
    create_user(&pool, "poet").await;
    let reader = create_user(&pool, "reader").await;
    create_session(&pool, reader, "reader-token").await;

    let app = test_app!(pool, Duration::from_secs(20));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/poet/follow/")
            .cookie(Cookie::new("session", "reader-token"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/poet/");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/poet/unfollow/")
            .cookie(Cookie::new("session", "reader-token"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
