//! Output contract for articles returned to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::Article;
use crate::sanitize::sanitize;

/// Article as sent over the wire. `title` and `content` are sanitized;
/// `author` is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub id: i32,
    pub style: String,
    pub title: String,
    pub content: String,
    pub date_published: DateTime<Utc>,
    pub author: Option<i32>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            style: article.style,
            title: sanitize(&article.title),
            content: sanitize(&article.content),
            date_published: article.date_published.and_utc(),
            author: article.author,
        }
    }
}

impl From<&Article> for ArticleResponse {
    fn from(article: &Article) -> Self {
        Self::from(article.clone())
    }
}
