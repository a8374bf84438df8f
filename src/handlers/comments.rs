/// Comment handlers - HTTP endpoint for comment submission
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use super::{found, parse_post_id};
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::services::CommentService;

/// Submission payload for the comment form.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "crate::handlers::not_blank"))]
    pub text: String,
}

/// Create a comment and return to the post page.
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse> {
    let (username, raw_post_id) = path.into_inner();
    let post_id = parse_post_id(&raw_post_id)?;
    form.validate()?;

    let service = CommentService::new((**pool).clone());
    service
        .add_comment(user.id, &username, post_id, &form.text)
        .await?;

    Ok(found(&format!("/{username}/{post_id}/")))
}
