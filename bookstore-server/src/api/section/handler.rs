//! Section API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::{Section, SectionCreate, SectionUpdate, SectionWithProducts};
use shared::query::ListQuery;

/// Section listing, shaped by `withProducts`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SectionList {
    Plain(Vec<Section>),
    WithProducts(Vec<SectionWithProducts>),
}

/// GET /section
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<SectionList>> {
    let sections = state.sections();
    let list = if query.with_products {
        SectionList::WithProducts(sections.find_all_with_products(&query)?)
    } else {
        SectionList::Plain(sections.find_all(&query)?)
    };
    Ok(Json(list))
}

/// GET /section/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Section>> {
    Ok(Json(state.sections().find_by_id(&id)?))
}

/// POST /section
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SectionCreate>,
) -> AppResult<(StatusCode, Json<Section>)> {
    let section = state.sections().create(payload)?;
    Ok((StatusCode::CREATED, Json(section)))
}

/// PATCH /section/{id} - `parent: null` moves the section to the top level
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SectionUpdate>,
) -> AppResult<Json<Section>> {
    Ok(Json(state.sections().update(&id, payload)?))
}

/// DELETE /section/{id} - refused while products are linked
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.sections().delete(&id)?;
    tracing::info!(id = %id, "Section deleted");
    Ok(StatusCode::NO_CONTENT)
}
