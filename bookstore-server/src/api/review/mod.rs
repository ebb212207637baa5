//! Review routes
//!
//! Reviews hang off products for listing and posting; a single review is
//! addressed by its own id. Deleting is for the review's author or an admin.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/product/{id}/review",
            get(handler::list_for_product).post(handler::create),
        )
        .route(
            "/review/{id}",
            get(handler::get_by_id).delete(handler::delete),
        )
}
