/// Post handlers - HTTP endpoints for feed listings, post pages, and authoring
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::{found, parse_post_id};
use crate::cache::PageCache;
use crate::error::{AppError, Result};
use crate::middleware::{AuthenticatedUser, Viewer};
use crate::models::{Group, PostDetail};
use crate::pagination::PageQuery;
use crate::services::PostService;

/// Submission payload for the create and edit forms.
#[derive(Debug, Deserialize, Validate)]
pub struct PostForm {
    #[validate(custom(function = "crate::handlers::not_blank"))]
    pub text: String,
    pub group: Option<Uuid>,
    pub image_key: Option<String>,
}

/// Context for the blank create-post form.
#[derive(Debug, Serialize)]
pub struct PostFormContext {
    pub groups: Vec<Group>,
}

/// Context for the pre-filled edit form.
#[derive(Debug, Serialize)]
pub struct EditPostContext {
    pub post: PostDetail,
    pub groups: Vec<Group>,
}

/// Paginated global feed.
///
/// The canonical request (no `page` parameter) is served from the home page
/// cache for its whole expiry window, even when posts land in the interim.
pub async fn index(
    pool: web::Data<PgPool>,
    cache: web::Data<PageCache>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let cacheable = query.is_default();
    if cacheable {
        if let Some((content_type, body)) = cache.get() {
            return Ok(HttpResponse::Ok().content_type(content_type).body(body));
        }
    }

    let service = PostService::new((**pool).clone());
    let page = service.home_page(query.number()).await?;

    let body = serde_json::to_vec(&page).map_err(|e| AppError::Internal(e.to_string()))?;
    if cacheable {
        cache.store("application/json", &body);
    }

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

/// Paginated feed for one group.
pub async fn group_posts(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();
    let service = PostService::new((**pool).clone());
    let view = service.group_page(&slug, query.number()).await?;

    Ok(HttpResponse::Ok().json(view))
}

/// Author profile with their paginated feed and follow context.
pub async fn profile(
    pool: web::Data<PgPool>,
    viewer: Viewer,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let viewer_id = viewer.0.map(|u| u.id);

    let service = PostService::new((**pool).clone());
    let view = service
        .profile_page(&username, query.number(), viewer_id)
        .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// Single post with its comments.
pub async fn post_detail(
    pool: web::Data<PgPool>,
    viewer: Viewer,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (username, raw_post_id) = path.into_inner();
    let post_id = parse_post_id(&raw_post_id)?;
    let viewer_id = viewer.0.map(|u| u.id);

    let service = PostService::new((**pool).clone());
    let view = service.post_page(&username, post_id, viewer_id).await?;

    Ok(HttpResponse::Ok().json(view))
}

/// Blank create-post form context.
pub async fn new_post_form(
    pool: web::Data<PgPool>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let groups = service.form_groups().await?;

    Ok(HttpResponse::Ok().json(PostFormContext { groups }))
}

/// Create a new post and return to the global feed.
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    form.validate()?;

    let service = PostService::new((**pool).clone());
    service
        .create_post(user.id, &form.text, form.group, form.image_key.as_deref())
        .await?;

    Ok(found("/"))
}

/// Pre-filled edit form context; non-authors are sent to the read view.
pub async fn edit_post_form(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (username, raw_post_id) = path.into_inner();
    let post_id = parse_post_id(&raw_post_id)?;

    let service = PostService::new((**pool).clone());
    let view = service.post_page(&username, post_id, Some(user.id)).await?;

    if view.post.author_id != user.id {
        return Ok(found(&post_url(&username, post_id)));
    }

    let groups = service.form_groups().await?;
    Ok(HttpResponse::Ok().json(EditPostContext {
        post: view.post,
        groups,
    }))
}

/// Apply an edit; non-authors are sent to the read view with state unchanged.
pub async fn update_post(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let (username, raw_post_id) = path.into_inner();
    let post_id = parse_post_id(&raw_post_id)?;

    let service = PostService::new((**pool).clone());
    match service
        .update_post(
            user.id,
            &username,
            post_id,
            &form.text,
            form.group,
            form.image_key.as_deref(),
        )
        .await
    {
        Ok(()) => Ok(found(&post_url(&username, post_id))),
        Err(AppError::PermissionDenied(_)) => Ok(found(&post_url(&username, post_id))),
        Err(err) => Err(err),
    }
}

fn post_url(username: &str, post_id: Uuid) -> String {
    format!("/{username}/{post_id}/")
}
