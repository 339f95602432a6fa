//! # Articles
//!
//! The one resource this service exposes.
//!
//! - `service`: data access over the `blogful_articles` table
//! - `routes`: validation, existence guard, and HTTP status mapping
//! - `serializer`: sanitized output contract

pub mod model;
pub mod routes;
pub mod serializer;
pub mod service;

pub use model::{Article, ArticleChanges, NewArticle};
pub use routes::{articles_routes, ArticleLookup, ArticlesState, ExistingArticle};
pub use serializer::ArticleResponse;
