//! # Fault Boundary
//!
//! Last stop for store failures. Handlers render them as a generic 500
//! and attach the detail; this middleware decides, from the environment
//! it was built with, whether the client sees that detail.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::config::Environment;
use super::errors::ErrorBody;

/// Error detail carried in response extensions from a failed handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultDetail(pub String);

/// Decides how verbose 500 responses are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultBoundary {
    environment: Environment,
}

impl FaultBoundary {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// Rewrite `response` if it carries a fault. Production keeps the
    /// generic body; elsewhere the detail is logged and returned.
    pub fn render(&self, mut response: Response) -> Response {
        let Some(FaultDetail(detail)) = response.extensions_mut().remove::<FaultDetail>() else {
            return response;
        };

        if self.environment.is_production() {
            return response;
        }

        tracing::error!(error = %detail, "request failed");
        (response.status(), Json(ErrorBody::new(detail))).into_response()
    }
}

/// Middleware entry point, installed with `from_fn_with_state`.
pub async fn fault_boundary(
    State(boundary): State<FaultBoundary>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    boundary.render(response)
}
