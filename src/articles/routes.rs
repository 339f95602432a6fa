//! Articles HTTP Routes
//!
//! Collection path `/articles` (list, create) and item path
//! `/articles/:id` (read, update, delete). Every item verb goes through the
//! [`ExistingArticle`] guard first, so a missing id is a 404 before any
//! body is looked at.

use std::sync::Arc;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, OriginalUri, Path, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::model::{Article, ArticleChanges, NewArticle};
use super::serializer::ArticleResponse;
use super::service;
use crate::db::{self, DbPool, StoreResult};
use crate::http_server::errors::{ApiError, ApiResult};

// ==================
// Shared State
// ==================

/// Articles state shared across handlers
pub struct ArticlesState {
    pub pool: DbPool,
}

impl ArticlesState {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run one data-access call on a pooled connection.
    async fn run<F, T>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        db::interact(&self.pool, op).await
    }
}

/// Create articles routes. Both paths also answer with a trailing slash.
pub fn articles_routes(state: Arc<ArticlesState>) -> Router {
    let collection = get(list_articles_handler).post(create_article_handler);
    let item = get(get_article_handler)
        .patch(update_article_handler)
        .delete(delete_article_handler);

    Router::new()
        .route("/articles", collection.clone())
        .route("/articles/", collection)
        .route("/articles/:id", item.clone())
        .route("/articles/:id/", item)
        .with_state(state)
}

// ==================
// Existence Guard
// ==================

/// Outcome of looking an article up by its path id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleLookup {
    Found(Article),
    NotFound,
}

impl ArticleLookup {
    /// Look up `raw_id`. An id that is not an integer cannot match a row.
    pub async fn resolve(state: &ArticlesState, raw_id: &str) -> StoreResult<Self> {
        let Ok(id) = raw_id.trim().parse::<i32>() else {
            return Ok(ArticleLookup::NotFound);
        };

        let found = state.run(move |conn| service::get_by_id(conn, id)).await?;
        Ok(found.map_or(ArticleLookup::NotFound, ArticleLookup::Found))
    }
}

/// An article known to exist. Extracting it performs the lookup; a miss
/// rejects the request with 404.
#[derive(Debug, Clone)]
pub struct ExistingArticle(pub Article);

#[async_trait]
impl FromRequestParts<Arc<ArticlesState>> for ExistingArticle {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ArticlesState>,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::ArticleNotFound)?;

        match ArticleLookup::resolve(state, &raw_id).await? {
            ArticleLookup::Found(article) => Ok(ExistingArticle(article)),
            ArticleLookup::NotFound => Err(ApiError::ArticleNotFound),
        }
    }
}

// ==================
// Request Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct CreateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub style: Option<String>,
    pub author: Option<i32>,
}

impl CreateArticleRequest {
    /// Checks run in a fixed order so the reported field is deterministic.
    /// Only absence counts as missing; an empty string is accepted.
    pub fn into_new_article(self) -> ApiResult<NewArticle> {
        let title = self.title.ok_or(ApiError::MissingField("title"))?;
        let style = self.style.ok_or(ApiError::MissingField("style"))?;
        let content = self.content.ok_or(ApiError::MissingField("content"))?;

        Ok(NewArticle {
            title,
            content,
            style,
            author: self.author,
            date_published: None,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub style: Option<String>,
}

impl UpdateArticleRequest {
    /// At least one field must be non-empty. Supplied fields, empty or not,
    /// are all written.
    pub fn into_changes(self) -> ApiResult<ArticleChanges> {
        let has_value = [&self.title, &self.style, &self.content]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.is_empty()));
        if !has_value {
            return Err(ApiError::EmptyPatch);
        }

        Ok(ArticleChanges {
            title: self.title,
            content: self.content,
            style: self.style,
        })
    }
}

/// Parse a JSON object body. A body that is empty or not declared as JSON
/// reads as `{}`.
fn parse_body<T>(headers: &HeaderMap, body: &Bytes) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

/// `application/json` or any `+json` media type, parameters ignored.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// `Location` for a new article: the collection path joined with its id.
fn location_for(collection_path: &str, id: i32) -> String {
    format!("{}/{}", collection_path.trim_end_matches('/'), id)
}

// ==================
// Handlers
// ==================

async fn list_articles_handler(
    State(state): State<Arc<ArticlesState>>,
) -> ApiResult<Json<Vec<ArticleResponse>>> {
    let articles = state.run(service::get_all_articles).await?;
    Ok(Json(articles.into_iter().map(ArticleResponse::from).collect()))
}

async fn create_article_handler(
    State(state): State<Arc<ArticlesState>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let request: CreateArticleRequest = parse_body(&headers, &body)?;
    let new_article = request.into_new_article()?;

    let article = state
        .run(move |conn| service::insert_article(conn, &new_article))
        .await?;
    tracing::info!(id = article.id, "article created");

    let location = location_for(uri.path(), article.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ArticleResponse::from(article)),
    ))
}

async fn get_article_handler(ExistingArticle(article): ExistingArticle) -> Json<ArticleResponse> {
    Json(ArticleResponse::from(article))
}

async fn update_article_handler(
    State(state): State<Arc<ArticlesState>>,
    ExistingArticle(article): ExistingArticle,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let request: UpdateArticleRequest = parse_body(&headers, &body)?;
    let changes = request.into_changes()?;

    let id = article.id;
    state
        .run(move |conn| service::update_article(conn, id, &changes))
        .await?;
    tracing::info!(id, "article updated");

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_article_handler(
    State(state): State<Arc<ArticlesState>>,
    ExistingArticle(article): ExistingArticle,
) -> ApiResult<StatusCode> {
    let id = article.id;
    state
        .run(move |conn| service::delete_article(conn, id))
        .await?;
    tracing::info!(id, "article deleted");

    Ok(StatusCode::NO_CONTENT)
}
