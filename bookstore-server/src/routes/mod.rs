//! Application router
//!
//! [`build_router`] registers every resource router; [`build_app`] wraps it
//! in the middleware stack shared by the HTTP server and oneshot calls.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;
use crate::middleware;

pub mod router_ext;
pub use router_ext::{OneshotResult, OneshotRouter};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Multipart framing on top of the raw upload size
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no middleware, no state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::health::router())
        .merge(api::auth::router())
        .merge(api::user::router())
        // Catalog
        .merge(api::contributor::router())
        .merge(api::publisher::router())
        .merge(api::book_series::router())
        .merge(api::section::router())
        .merge(api::product_type::router())
        .merge(api::product::router())
        .merge(api::review::router())
        .merge(api::search::router())
        // Shopping
        .merge(api::cart::router())
        .merge(api::delivery::router())
        .merge(api::order::router())
        .merge(api::upload::router())
}

/// Routes plus middleware; the caller applies the state
///
/// Layers run outermost first: request id, trace, CORS, compression,
/// request logging, authentication.
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes + MULTIPART_OVERHEAD,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}
