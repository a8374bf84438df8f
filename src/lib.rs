/// Blog Service Library
///
/// A blogging platform service: authors publish text posts (optionally with
/// an image reference and a group tag), readers browse paginated feeds,
/// comment on posts, and follow authors to build a personalized timeline.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route configuration
/// - `models`: Row structs and joined read models
/// - `services`: Business logic layer
/// - `db`: Database access layer and repositories
/// - `cache`: Time-boxed home-feed page cache
/// - `middleware`: Session resolution and identity extractors
/// - `pagination`: Fixed-size page computation
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
