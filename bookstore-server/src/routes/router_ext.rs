//! In-process calls through the full application stack
//!
//! Runs a request through the same router and middleware the HTTP server
//! uses, without a socket. Integration tests drive the API this way.

use anyhow::Result;
use axum::body::Body;
use http::{Request, Response};
use tower::ServiceExt;

use crate::core::ServerState;
use crate::routes::build_app;

/// Result type for oneshot API calls
pub type OneshotResult = Result<Response<Body>>;

#[async_trait::async_trait]
pub trait OneshotRouter {
    /// Process one request
    ///
    /// ```ignore
    /// let request = Request::builder().uri("/health").body(Body::empty())?;
    /// let response = state.oneshot(request).await?;
    /// ```
    async fn oneshot(&self, request: Request<Body>) -> OneshotResult;
}

#[async_trait::async_trait]
impl OneshotRouter for ServerState {
    async fn oneshot(&self, request: Request<Body>) -> OneshotResult {
        let app = build_app(self).with_state(self.clone());
        let response = ServiceExt::oneshot(app, request).await?;
        Ok(response)
    }
}
