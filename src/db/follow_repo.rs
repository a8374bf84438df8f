use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Idempotent create follow; returns true if a new edge was inserted.
pub async fn create_follow(
    pool: &PgPool,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO follows (id, user_id, author_id, created_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (user_id, author_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Idempotent delete; returns true if an edge was removed.
pub async fn delete_follow(
    pool: &PgPool,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE user_id = $1 AND author_id = $2
        "#,
    )
    .bind(user_id)
    .bind(author_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Whether `user_id` follows `author_id`.
pub async fn is_following(
    pool: &PgPool,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2) as following",
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<bool, _>("following"))
}

/// Number of users following the given author.
pub async fn count_followers(pool: &PgPool, author_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM follows WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Number of authors the given user follows.
pub async fn count_following(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM follows WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}
