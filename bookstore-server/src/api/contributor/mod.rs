//! Contributor routes
//!
//! Five roles share one set of handlers, each mounted under its collection
//! name: `/author`, `/compiler`, `/translator`, `/illustrator`, `/editor`.
//! Reads are public; writes need a seller or admin.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::{STAFF, require_role};
use crate::core::ServerState;
use shared::models::{AuthorRole, CompilerRole, ContributorRole, EditorRole, IllustratorRole, TranslatorRole};

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(role_router::<AuthorRole>())
        .merge(role_router::<CompilerRole>())
        .merge(role_router::<TranslatorRole>())
        .merge(role_router::<IllustratorRole>())
        .merge(role_router::<EditorRole>())
}

fn role_router<R: ContributorRole>() -> Router<ServerState> {
    Router::new().nest(&format!("/{}", R::COLLECTION), routes::<R>())
}

fn routes<R: ContributorRole>() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list::<R>))
        .route("/{id}", get(handler::get_by_id::<R>));

    let write_routes = Router::new()
        .route("/", post(handler::create::<R>))
        .route(
            "/{id}",
            patch(handler::update::<R>).delete(handler::delete::<R>),
        )
        .layer(middleware::from_fn(require_role(STAFF)));

    read_routes.merge(write_routes)
}
