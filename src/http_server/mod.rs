//! # blogful HTTP Server Module
//!
//! Wires the articles routes into an Axum server.
//!
//! # Endpoints
//!
//! - `/` - Hello world
//! - `/articles` - List and create articles
//! - `/articles/:id` - Read, update and delete one article
//!
//! The articles routes can be mounted under a prefix (`/api/articles`)
//! via `AppConfig::api_prefix`.

pub mod config;
pub mod errors;
pub mod fault;
pub mod server;

pub use config::{AppConfig, ConfigError, Environment};
pub use errors::{ApiError, ApiResult, ErrorBody};
pub use fault::FaultBoundary;
pub use server::{build_router, HttpServer};
