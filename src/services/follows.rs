/// Follow service - follow edges and the followed-authors timeline
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{follow_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::PostDetail;
use crate::pagination::{self, Page};

pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Follow an author by username.
    ///
    /// Self-follow and duplicate follow are silent no-ops; only an unknown
    /// author is an error.
    pub async fn follow(&self, user_id: Uuid, author_username: &str) -> Result<()> {
        let author = user_repo::find_user_by_username(&self.pool, author_username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {author_username}")))?;

        if author.id == user_id {
            tracing::debug!(user_id = %user_id, "self-follow ignored");
            return Ok(());
        }

        let created = follow_repo::create_follow(&self.pool, user_id, author.id).await?;
        if created {
            tracing::info!(user_id = %user_id, author_id = %author.id, "follow created");
        }

        Ok(())
    }

    /// Unfollow an author by username; a non-followed author is a no-op.
    pub async fn unfollow(&self, user_id: Uuid, author_username: &str) -> Result<()> {
        let author = user_repo::find_user_by_username(&self.pool, author_username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {author_username}")))?;

        let removed = follow_repo::delete_follow(&self.pool, user_id, author.id).await?;
        if removed {
            tracing::info!(user_id = %user_id, author_id = %author.id, "follow removed");
        }

        Ok(())
    }

    /// Timeline of posts by authors the user follows, newest-first.
    pub async fn feed_page(
        &self,
        user_id: Uuid,
        requested: Option<i64>,
    ) -> Result<Page<PostDetail>> {
        let total = post_repo::count_followed_posts(&self.pool, user_id).await?;
        let bounds = pagination::clamp_page(requested, total);
        let items =
            post_repo::list_followed_posts(&self.pool, user_id, bounds.limit, bounds.offset)
                .await?;

        Ok(pagination::build_page(items, bounds, total))
    }
}
