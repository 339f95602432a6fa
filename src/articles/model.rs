//! Article rows and write payloads.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::db::schema::blogful_articles;

/// A stored article, as read back from `blogful_articles`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = blogful_articles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub style: String,
    pub date_published: NaiveDateTime,
    pub author: Option<i32>,
}

/// Fields for a new article. `id` is always assigned by the store;
/// `date_published` falls back to the column default when `None`.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = blogful_articles)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub style: String,
    pub author: Option<i32>,
    pub date_published: Option<NaiveDateTime>,
}

impl NewArticle {
    /// New article with store-assigned publish date and no author.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            style: style.into(),
            author: None,
            date_published: None,
        }
    }
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = blogful_articles)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub style: Option<String>,
}

impl ArticleChanges {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.style.is_none()
    }
}
