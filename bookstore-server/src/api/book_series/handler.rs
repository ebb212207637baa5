//! Book Series API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::{BookSeries, BookSeriesCreate, BookSeriesUpdate};
use shared::query::ListQuery;

/// GET /book-series
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<BookSeries>>> {
    Ok(Json(state.book_series().find_all(&query)?))
}

/// GET /book-series/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookSeries>> {
    Ok(Json(state.book_series().find_by_id(&id)?))
}

/// POST /book-series - the publisher must exist
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookSeriesCreate>,
) -> AppResult<(StatusCode, Json<BookSeries>)> {
    let series = state.book_series().create(payload)?;
    Ok((StatusCode::CREATED, Json(series)))
}

/// PATCH /book-series/{id} - replacing `books` moves them between series
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BookSeriesUpdate>,
) -> AppResult<Json<BookSeries>> {
    Ok(Json(state.book_series().update(&id, payload)?))
}

/// DELETE /book-series/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.book_series().delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
