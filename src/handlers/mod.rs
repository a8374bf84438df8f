/// HTTP handlers for blog-service
///
/// This module contains handlers for:
/// - Posts: feed listings, post pages, authoring
/// - Comments: comment submission
/// - Follows: follow/unfollow and the followed-authors feed
///
/// Literal routes are registered before the `{username}` captures so that
/// `/new`, `/follow/`, and `/group/...` are never swallowed by a profile
/// lookup.
use actix_web::{http::header, web, HttpResponse};
use uuid::Uuid;
use validator::ValidationError;

use crate::error::{AppError, Result};

pub mod comments;
pub mod follows;
pub mod posts;

pub use comments::add_comment;
pub use follows::{follow_index, profile_follow, profile_unfollow};
pub use posts::{
    create_post, edit_post_form, group_posts, index, new_post_form, post_detail, profile,
    update_post,
};

/// Register the public HTTP surface.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(posts::index)))
        .service(web::resource("/follow/").route(web::get().to(follows::follow_index)))
        .service(web::resource("/group/{slug}/").route(web::get().to(posts::group_posts)))
        .service(
            web::resource("/new")
                .route(web::get().to(posts::new_post_form))
                .route(web::post().to(posts::create_post)),
        )
        .service(web::resource("/{username}/follow/").route(web::get().to(follows::profile_follow)))
        .service(
            web::resource("/{username}/unfollow/").route(web::get().to(follows::profile_unfollow)),
        )
        .service(
            web::resource("/{username}/{post_id}/edit/")
                .route(web::get().to(posts::edit_post_form))
                .route(web::post().to(posts::update_post)),
        )
        .service(
            web::resource("/{username}/{post_id}/comment")
                .route(web::post().to(comments::add_comment)),
        )
        .service(web::resource("/{username}/{post_id}/").route(web::get().to(posts::post_detail)))
        .service(web::resource("/{username}/").route(web::get().to(posts::profile)));
}

/// Fallback for unmatched paths.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not found",
        "status": 404,
    }))
}

/// 302 redirect, the reference behavior for successful form submissions.
pub(crate) fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Path post ids that fail to parse behave like missing posts.
pub(crate) fn parse_post_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("post {raw}")))
}

/// validator-compatible rule: required text must survive trimming.
pub fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
