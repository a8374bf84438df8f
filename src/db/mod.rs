/// Database access layer
///
/// Repository modules expose free async functions over `&PgPool`; all
/// business rules (validation, permissions, pagination) live in `services`.
pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod user_repo;
