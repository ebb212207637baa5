//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::{Product, ProductCreate, ProductDetail, ProductUpdate};
use shared::query::ListQuery;

/// GET /product
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.products().find_all(&query)?))
}

/// GET /product/{id} - with its book or board game
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductDetail>> {
    Ok(Json(state.products().find_by_id(&id)?))
}

/// GET /product/key/{key}
pub async fn get_by_key(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> AppResult<Json<ProductDetail>> {
    Ok(Json(state.products().find_by_key(&key)?))
}

/// POST /product - product and its specific document in one transaction
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<ProductDetail>)> {
    let detail = state.products().create(payload)?;
    tracing::info!(
        id = %detail.product.id,
        code = detail.product.code,
        key = %detail.product.key,
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PATCH /product/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductDetail>> {
    Ok(Json(state.products().update(&id, payload)?))
}

/// DELETE /product/{id} - unlink everything, then soft delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.products().delete(&id)?;
    tracing::info!(id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
