//! # HTTP Errors
//!
//! Error type returned by route handlers and the JSON error body every
//! failure is rendered with.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fault::FaultDetail;
use crate::db::StoreError;

/// Message sent for store failures before the fault boundary decides how
/// much detail to reveal.
pub const GENERIC_SERVER_ERROR: &str = "server error";

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors produced while handling a request
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Required field absent or null on create
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),

    /// Patch body without any usable field
    #[error("Request body must contain 'title', 'style', or 'content'")]
    EmptyPatch,

    /// Request body is not a JSON object of the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// No article with the requested id
    #[error("Article doesn't exist")]
    ArticleNotFound,

    /// No route matches the request path
    #[error("Not Found")]
    RouteNotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store failure, propagated unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::EmptyPatch => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::ArticleNotFound => StatusCode::NOT_FOUND,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `{ "error": { "message": "..." } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Store(err) => {
                // detail rides along for the fault boundary
                let mut response =
                    (status, Json(ErrorBody::new(GENERIC_SERVER_ERROR))).into_response();
                response
                    .extensions_mut()
                    .insert(FaultDetail(err.to_string()));
                response
            }
            other => (status, Json(ErrorBody::new(other.to_string()))).into_response(),
        }
    }
}
