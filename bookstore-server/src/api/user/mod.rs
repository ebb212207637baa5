//! User administration
//!
//! Listing is admin only. Reading, updating and deleting a single user is
//! allowed for that user and for admins; only admins may change a role.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/user", routes())
}

fn routes() -> Router<ServerState> {
    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_admin));

    let own_routes = Router::new().route(
        "/{id}",
        get(handler::get_by_id)
            .patch(handler::update)
            .delete(handler::delete),
    );

    admin_routes.merge(own_routes)
}
