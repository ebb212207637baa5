//! Upload routes
//!
//! `POST /upload` takes a multipart `file` field (token required);
//! `GET /upload/{filename}` serves the stored JPEG publicly.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/upload", post(handler::upload))
        .route("/upload/{filename}", get(handler::serve))
}
