//! Authentication routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /auth/signup | POST | none |
//! | /auth/login | POST | none |
//! | /auth/restore | POST | none |
//! | /auth/me | GET | token |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/signup", post(handler::signup))
        .route("/login", post(handler::login))
        .route("/restore", post(handler::restore))
        .route("/me", get(handler::me))
}
