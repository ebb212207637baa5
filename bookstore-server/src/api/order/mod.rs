//! Order routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /order | POST | optional; guests get an account |
//! | /order | GET | token; staff see every order |
//! | /order/{id} | GET | owner or staff |
//! | /order/{id}/status | PATCH | seller, admin |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::{STAFF, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/order", routes())
}

fn routes() -> Router<ServerState> {
    let customer_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id));

    let staff_routes = Router::new()
        .route("/{id}/status", patch(handler::update_status))
        .layer(middleware::from_fn(require_role(STAFF)));

    customer_routes.merge(staff_routes)
}
