//! Publisher API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::{Publisher, PublisherCreate, PublisherUpdate};
use shared::query::ListQuery;

/// GET /publisher
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Publisher>>> {
    Ok(Json(state.publishers().find_all(&query)?))
}

/// GET /publisher/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Publisher>> {
    Ok(Json(state.publishers().find_by_id(&id)?))
}

/// POST /publisher
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PublisherCreate>,
) -> AppResult<(StatusCode, Json<Publisher>)> {
    let publisher = state.publishers().create(payload)?;
    Ok((StatusCode::CREATED, Json(publisher)))
}

/// PATCH /publisher/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PublisherUpdate>,
) -> AppResult<Json<Publisher>> {
    Ok(Json(state.publishers().update(&id, payload)?))
}

/// DELETE /publisher/{id} - refused while books reference it; its series go too
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.publishers().delete(&id)?;
    tracing::info!(id = %id, "Publisher deleted");
    Ok(StatusCode::NO_CONTENT)
}
