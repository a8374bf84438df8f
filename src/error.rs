/// Error types for blog-service
///
/// Errors are converted to HTTP responses: `NotFound` → 404,
/// `Validation` → 400 with per-field messages, `AuthenticationRequired`
/// → 302 to the login page, everything else → 403/500.
use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("authentication required")]
    AuthenticationRequired { location: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationRequired { .. } => StatusCode::FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::AuthenticationRequired { location } => HttpResponse::Found()
                .insert_header((header::LOCATION, location.as_str()))
                .finish(),
            AppError::Validation(errors) => HttpResponse::BadRequest().json(serde_json::json!({
                "errors": errors,
                "status": StatusCode::BAD_REQUEST.as_u16(),
            })),
            other => {
                let status = other.status_code();
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("request failed: {}", other);
                }
                HttpResponse::build(status).json(serde_json::json!({
                    "error": other.to_string(),
                    "status": status.as_u16(),
                }))
            }
        }
    }
}

/// Build a single-field validation failure outside of derive-based checks.
pub fn field_error(field: &'static str, code: &'static str) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, ValidationError::new(code));
    AppError::Validation(errors)
}
