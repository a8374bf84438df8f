/// Follow handlers - HTTP endpoints for follow edges and the timeline feed
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use super::found;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::pagination::PageQuery;
use crate::services::FollowService;

/// Paginated feed of posts by authors the user follows.
pub async fn follow_index(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = FollowService::new((**pool).clone());
    let page = service.feed_page(user.id, query.number()).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Follow an author and return to their profile.
pub async fn profile_follow(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner();

    let service = FollowService::new((**pool).clone());
    service.follow(user.id, &username).await?;

    Ok(found(&format!("/{username}/")))
}

/// Unfollow an author and return to their profile.
pub async fn profile_unfollow(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner();

    let service = FollowService::new((**pool).clone());
    service.unfollow(user.id, &username).await?;

    Ok(found(&format!("/{username}/")))
}
