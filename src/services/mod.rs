/// Business logic layer for blog-service
///
/// - Post service: listings, single-post context, creation and editing
/// - Comment service: comment creation
/// - Follow service: follow edges and the followed-authors timeline
pub mod comments;
pub mod follows;
pub mod posts;

pub use comments::CommentService;
pub use follows::FollowService;
pub use posts::{GroupView, PostService, PostView, ProfileView};
