//! # HTTP Server
//!
//! Main HTTP server: the root route plus the articles routes, wrapped in
//! the fault boundary, request tracing, security headers and CORS.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::config::AppConfig;
use super::errors::ApiError;
use super::fault::{fault_boundary, FaultBoundary};
use crate::articles::{articles_routes, ArticlesState};
use crate::db::DbPool;

/// HTTP server for the articles API
pub struct HttpServer {
    config: AppConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over an already-migrated pool
    pub fn new(config: AppConfig, pool: DbPool) -> Self {
        let router = build_router(&config, pool);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr.as_str()).await?;

        tracing::info!(
            addr = %listener.local_addr()?,
            environment = %self.config.environment,
            "blogful listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}

/// Build the full application router.
pub fn build_router(config: &AppConfig, pool: DbPool) -> Router {
    let articles = articles_routes(Arc::new(ArticlesState::new(pool)));

    let prefix = config.mount_prefix();
    let api = if prefix.is_empty() {
        articles
    } else {
        Router::new().nest(&prefix, articles)
    };

    let verbose = !config.environment.is_production();
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(verbose))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(root_handler))
        .merge(api)
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(
            FaultBoundary::new(config.environment),
            fault_boundary,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_DNS_PREFETCH_CONTROL,
            HeaderValue::from_static("off"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(trace)
        .layer(cors_layer(config))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root_handler() -> &'static str {
    "Hello, world!"
}

async fn not_found_handler() -> ApiError {
    ApiError::RouteNotFound
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
