//! Catalog search
//!
//! `GET /search?query=&limit=&offset=` matches product names and the names
//! of a book's contributors and publisher, case-insensitively.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::Product;
use shared::query::SearchQuery;

pub fn router() -> Router<ServerState> {
    Router::new().route("/search", get(search))
}

/// GET /search
async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.search().search(&query)?))
}
