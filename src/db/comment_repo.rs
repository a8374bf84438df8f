use crate::models::{Comment, CommentDetail};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, author_id, text)
        VALUES ($1, $2, $3)
        RETURNING id, post_id, author_id, text, created_at
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Get all comments for a post, newest-first
pub async fn list_comments_for_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<CommentDetail>, sqlx::Error> {
    let comments = sqlx::query_as::<_, CommentDetail>(
        r#"
        SELECT c.id, c.post_id, c.text, c.created_at,
               u.username AS author_username, u.display_name AS author_display_name
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}
