/// Post service - listings, single-post context, creation and editing
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, follow_repo, group_repo, post_repo, user_repo};
use crate::error::{field_error, AppError, Result};
use crate::models::{CommentDetail, Group, Post, PostDetail, User};
use crate::pagination::{self, Page};

pub struct PostService {
    pool: PgPool,
}

/// Context for an author profile page.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub author: User,
    pub page: Page<PostDetail>,
    pub post_count: i64,
    pub following: bool,
    pub follower_count: i64,
    pub following_count: i64,
}

/// Context for a single-post page.
#[derive(Debug, Serialize)]
pub struct PostView {
    pub post: PostDetail,
    pub comments: Vec<CommentDetail>,
    pub post_count: i64,
    pub following: bool,
    pub follower_count: i64,
    pub following_count: i64,
}

/// Context for a group listing page.
#[derive(Debug, Serialize)]
pub struct GroupView {
    pub group: Group,
    pub page: Page<PostDetail>,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Global feed, newest-first.
    pub async fn home_page(&self, requested: Option<i64>) -> Result<Page<PostDetail>> {
        let total = post_repo::count_posts(&self.pool).await?;
        let bounds = pagination::clamp_page(requested, total);
        let items = post_repo::list_posts(&self.pool, bounds.limit, bounds.offset).await?;

        Ok(pagination::build_page(items, bounds, total))
    }

    /// Feed filtered to one group, resolved by slug.
    pub async fn group_page(&self, slug: &str, requested: Option<i64>) -> Result<GroupView> {
        let group = group_repo::find_group_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group {slug}")))?;

        let total = post_repo::count_posts_by_group(&self.pool, group.id).await?;
        let bounds = pagination::clamp_page(requested, total);
        let items =
            post_repo::list_posts_by_group(&self.pool, group.id, bounds.limit, bounds.offset)
                .await?;

        Ok(GroupView {
            group,
            page: pagination::build_page(items, bounds, total),
        })
    }

    /// Author profile: their feed plus post count and follow context.
    pub async fn profile_page(
        &self,
        username: &str,
        requested: Option<i64>,
        viewer: Option<Uuid>,
    ) -> Result<ProfileView> {
        let author = user_repo::find_user_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;

        let post_count = post_repo::count_posts_by_author(&self.pool, author.id).await?;
        let bounds = pagination::clamp_page(requested, post_count);
        let items =
            post_repo::list_posts_by_author(&self.pool, author.id, bounds.limit, bounds.offset)
                .await?;

        let (following, follower_count, following_count) =
            self.follow_context(viewer, author.id).await?;

        Ok(ProfileView {
            author,
            page: pagination::build_page(items, bounds, post_count),
            post_count,
            following,
            follower_count,
            following_count,
        })
    }

    /// Single post with its comments; the (username, post id) pair must match.
    pub async fn post_page(
        &self,
        username: &str,
        post_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<PostView> {
        let post = post_repo::find_post(&self.pool, username, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} by {username}")))?;

        let comments = comment_repo::list_comments_for_post(&self.pool, post.id).await?;
        let post_count = post_repo::count_posts_by_author(&self.pool, post.author_id).await?;
        let (following, follower_count, following_count) =
            self.follow_context(viewer, post.author_id).await?;

        Ok(PostView {
            post,
            comments,
            post_count,
            following,
            follower_count,
            following_count,
        })
    }

    /// Create a new post; author and timestamp are assigned by the system.
    pub async fn create_post(
        &self,
        author_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image_key: Option<&str>,
    ) -> Result<Post> {
        let text = text.trim();
        if text.is_empty() {
            return Err(field_error("text", "blank"));
        }
        if let Some(group_id) = group_id {
            if group_repo::find_group_by_id(&self.pool, group_id)
                .await?
                .is_none()
            {
                return Err(field_error("group", "unknown_group"));
            }
        }

        let post = post_repo::create_post(&self.pool, author_id, text, group_id, image_key).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");

        Ok(post)
    }

    /// Update a post's text, group, and image; only the author may do this.
    pub async fn update_post(
        &self,
        editor_id: Uuid,
        username: &str,
        post_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image_key: Option<&str>,
    ) -> Result<()> {
        let post = post_repo::find_post(&self.pool, username, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} by {username}")))?;

        if post.author_id != editor_id {
            tracing::debug!(post_id = %post_id, editor_id = %editor_id, "edit denied");
            return Err(AppError::PermissionDenied(format!(
                "post {post_id} belongs to another author"
            )));
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(field_error("text", "blank"));
        }
        if let Some(group_id) = group_id {
            if group_repo::find_group_by_id(&self.pool, group_id)
                .await?
                .is_none()
            {
                return Err(field_error("group", "unknown_group"));
            }
        }

        post_repo::update_post(&self.pool, post.id, text, group_id, image_key).await?;

        Ok(())
    }

    /// Group choices for create/edit form contexts.
    pub async fn form_groups(&self) -> Result<Vec<Group>> {
        Ok(group_repo::list_groups(&self.pool).await?)
    }

    async fn follow_context(
        &self,
        viewer: Option<Uuid>,
        author_id: Uuid,
    ) -> Result<(bool, i64, i64)> {
        let following = match viewer {
            Some(viewer) => follow_repo::is_following(&self.pool, viewer, author_id).await?,
            None => false,
        };
        let follower_count = follow_repo::count_followers(&self.pool, author_id).await?;
        let following_count = follow_repo::count_following(&self.pool, author_id).await?;

        Ok((following, follower_count, following_count))
    }
}
