//! Product routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /product | GET | none |
//! | /product/{id} | GET | none |
//! | /product/key/{key} | GET | none |
//! | /product | POST | seller, admin |
//! | /product/{id} | PATCH, DELETE | seller, admin |
//!
//! Reviews of a product are routed by [`crate::api::review`].

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::{STAFF, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/product", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/key/{key}", get(handler::get_by_key))
        .route("/{id}", get(handler::get_by_id));

    let write_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", patch(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_role(STAFF)));

    read_routes.merge(write_routes)
}
