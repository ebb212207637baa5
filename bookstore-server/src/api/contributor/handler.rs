//! Contributor API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::{Contributor, ContributorCreate, ContributorRole, ContributorUpdate};
use shared::query::ListQuery;

/// GET /{role} - active contributors of one role
pub async fn list<R: ContributorRole>(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Contributor<R>>>> {
    Ok(Json(state.contributors::<R>().find_all(&query)?))
}

/// GET /{role}/{id}
pub async fn get_by_id<R: ContributorRole>(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Contributor<R>>> {
    Ok(Json(state.contributors::<R>().find_by_id(&id)?))
}

/// POST /{role}
pub async fn create<R: ContributorRole>(
    State(state): State<ServerState>,
    Json(payload): Json<ContributorCreate>,
) -> AppResult<(StatusCode, Json<Contributor<R>>)> {
    let contributor = state.contributors::<R>().create(payload)?;
    tracing::info!(role = R::COLLECTION, id = %contributor.id, "Contributor created");
    Ok((StatusCode::CREATED, Json(contributor)))
}

/// PATCH /{role}/{id}
pub async fn update<R: ContributorRole>(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ContributorUpdate>,
) -> AppResult<Json<Contributor<R>>> {
    Ok(Json(state.contributors::<R>().update(&id, payload)?))
}

/// DELETE /{role}/{id} - unlink from books, then soft delete
pub async fn delete<R: ContributorRole>(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.contributors::<R>().delete(&id)?;
    tracing::info!(role = R::COLLECTION, id = %id, "Contributor deleted");
    Ok(StatusCode::NO_CONTENT)
}
