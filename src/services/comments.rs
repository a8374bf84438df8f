/// Comment service - comment creation against existing posts
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, post_repo};
use crate::error::{field_error, AppError, Result};
use crate::models::Comment;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a comment; the target post is resolved by the exact
    /// (author username, post id) pair.
    pub async fn add_comment(
        &self,
        author_id: Uuid,
        post_author: &str,
        post_id: Uuid,
        text: &str,
    ) -> Result<Comment> {
        let post = post_repo::find_post(&self.pool, post_author, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} by {post_author}")))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(field_error("text", "blank"));
        }

        let comment = comment_repo::create_comment(&self.pool, post.id, author_id, text).await?;
        tracing::info!(comment_id = %comment.id, post_id = %post.id, "comment created");

        Ok(comment)
    }
}
