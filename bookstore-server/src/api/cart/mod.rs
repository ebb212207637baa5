//! Cart routes, also served under `/basket`
//!
//! | Path | Method | Body |
//! |------|--------|------|
//! | / | GET | |
//! | / | DELETE | |
//! | /item | POST | `{product, quantity?}` |
//! | /item | DELETE | `{product, quantity?}` |
//! | /merge | POST | `{items: [{product, quantity}]}` |
//!
//! Every route acts on the caller's own cart.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/cart", routes())
        .nest("/basket", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::view).delete(handler::clear))
        .route(
            "/item",
            post(handler::add_item).delete(handler::remove_item),
        )
        .route("/merge", post(handler::merge))
}
