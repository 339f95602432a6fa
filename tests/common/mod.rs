//! Shared fixtures for endpoint tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use blogful::articles::{service, ArticleResponse};
use blogful::db::schema::blogful_articles;
use blogful::db::{self, DbPool};
use blogful::http_server::{build_router, AppConfig, Environment};

// =============================================================================
// Test Application
// =============================================================================

pub struct TestApp {
    _tmp: TempDir,
    pub pool: DbPool,
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn error_message(&self) -> String {
        let value: Value = self.json();
        value["error"]["message"].as_str().unwrap().to_string()
    }

    pub fn location(&self) -> &str {
        self.headers[header::LOCATION].to_str().unwrap()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig {
            environment: Environment::Test,
            ..Default::default()
        })
    }

    pub fn with_config(mut config: AppConfig) -> Self {
        let tmp = TempDir::new().unwrap();
        config.database_url = tmp.path().join("blogful.db").to_str().unwrap().to_string();

        let pool = db::create_pool(&config.database_url, 2).unwrap();
        db::run_migrations(&pool).unwrap();
        let router = build_router(&config, pool.clone());

        Self {
            _tmp: tmp,
            pool,
            router,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Send `body` as-is under the given content type.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: &'static str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Insert rows directly, keeping the fixture ids.
    pub fn seed(&self, articles: &[ArticleResponse]) {
        let mut conn = self.pool.get().unwrap();
        for article in articles {
            diesel::insert_into(blogful_articles::table)
                .values((
                    blogful_articles::id.eq(article.id),
                    blogful_articles::title.eq(&article.title),
                    blogful_articles::content.eq(&article.content),
                    blogful_articles::style.eq(&article.style),
                    blogful_articles::date_published.eq(article.date_published.naive_utc()),
                    blogful_articles::author.eq(article.author),
                ))
                .execute(&mut conn)
                .unwrap();
        }
    }

    /// Empty the table between scenarios.
    pub fn truncate(&self) {
        let mut conn = self.pool.get().unwrap();
        service::truncate_articles(&mut conn).unwrap();
    }

    /// Break the store so every query fails.
    pub fn drop_articles_table(&self) {
        let mut conn = self.pool.get().unwrap();
        diesel::sql_query("DROP TABLE blogful_articles")
            .execute(&mut conn)
            .unwrap();
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn fixture_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2029, 1, 22, 16, 28, 32).unwrap() + chrono::Duration::milliseconds(615)
}

fn fixture(id: i32, title: &str, style: &str, content: &str) -> ArticleResponse {
    ArticleResponse {
        id,
        style: style.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        date_published: fixture_date(),
        author: None,
    }
}

pub fn make_articles_array() -> Vec<ArticleResponse> {
    vec![
        fixture(
            1,
            "First test post!",
            "How-to",
            "Lorem ipsum dolor sit amet, consectetur adipisicing elit. Natus consequuntur deserunt commodi.",
        ),
        fixture(
            2,
            "Second test post!",
            "News",
            "Lorem ipsum dolor sit amet consectetur adipisicing elit. Cum, exercitationem cupiditate dignissimos est.",
        ),
        fixture(
            3,
            "Third test post!",
            "Listicle",
            "Lorem ipsum dolor sit amet consectetur adipisicing elit. Possimus, voluptate?",
        ),
        fixture(
            4,
            "Fourth test post!",
            "Story",
            "Lorem ipsum dolor sit amet consectetur adipisicing elit. Earum molestiae accusamus veniam consectetur.",
        ),
    ]
}

/// A stored article carrying script and event-handler markup, and the
/// sanitized form clients should receive.
pub fn make_malicious_article() -> (ArticleResponse, ArticleResponse) {
    let malicious = fixture(
        911,
        r#"Naughty naughty very naughty <script>alert("xss");</script>"#,
        "How-to",
        r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#,
    );
    let expected = fixture(
        911,
        r#"Naughty naughty very naughty &lt;script&gt;alert("xss");&lt;/script&gt;"#,
        "How-to",
        r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#,
    );
    (malicious, expected)
}
