use crate::models::{Post, PostDetail};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Create a new post; the store assigns id and creation timestamp.
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image_key: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, group_id, text, image_key)
        VALUES ($1, $2, $3, $4)
        RETURNING id, author_id, group_id, text, image_key, created_at
        "#,
    )
    .bind(author_id)
    .bind(group_id)
    .bind(text)
    .bind(image_key)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Update a post's mutable fields; author and creation timestamp never change.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image_key: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET text = $1, group_id = $2, image_key = $3
        WHERE id = $4
        "#,
    )
    .bind(text)
    .bind(group_id)
    .bind(image_key)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Find a post by the exact (author username, post id) pair.
pub async fn find_post(
    pool: &PgPool,
    author_username: &str,
    post_id: Uuid,
) -> Result<Option<PostDetail>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostDetail>(
        r#"
        SELECT p.id, p.text, p.image_key, p.created_at,
               u.id AS author_id, u.username AS author_username, u.display_name AS author_display_name,
               g.id AS group_id, g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE p.id = $1 AND u.username = $2
        "#,
    )
    .bind(post_id)
    .bind(author_username)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// List all posts, newest-first.
pub async fn list_posts(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostDetail>(
        r#"
        SELECT p.id, p.text, p.image_key, p.created_at,
               u.id AS author_id, u.username AS author_username, u.display_name AS author_display_name,
               g.id AS group_id, g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        ORDER BY p.created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count all posts.
pub async fn count_posts(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts")
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// List posts in a group, newest-first.
pub async fn list_posts_by_group(
    pool: &PgPool,
    group_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostDetail>(
        r#"
        SELECT p.id, p.text, p.image_key, p.created_at,
               u.id AS author_id, u.username AS author_username, u.display_name AS author_display_name,
               g.id AS group_id, g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE p.group_id = $1
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(group_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts in a group.
pub async fn count_posts_by_group(pool: &PgPool, group_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE group_id = $1")
        .bind(group_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// List posts by an author, newest-first.
pub async fn list_posts_by_author(
    pool: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostDetail>(
        r#"
        SELECT p.id, p.text, p.image_key, p.created_at,
               u.id AS author_id, u.username AS author_username, u.display_name AS author_display_name,
               g.id AS group_id, g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE p.author_id = $1
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(author_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts by an author.
pub async fn count_posts_by_author(pool: &PgPool, author_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// List posts authored by anyone the given user follows, newest-first.
pub async fn list_followed_posts(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostDetail>(
        r#"
        SELECT p.id, p.text, p.image_key, p.created_at,
               u.id AS author_id, u.username AS author_username, u.display_name AS author_display_name,
               g.id AS group_id, g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON u.id = p.author_id
        JOIN follows f ON f.author_id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE f.user_id = $1
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts authored by anyone the given user follows.
pub async fn count_followed_posts(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count
        FROM posts p
        JOIN follows f ON f.author_id = p.author_id
        WHERE f.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}
