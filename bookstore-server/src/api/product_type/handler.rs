//! Product Type API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::{ProductType, ProductTypeCreate};

/// GET /product-type
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductType>>> {
    Ok(Json(state.product_types().find_all()?))
}

/// GET /product-type/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductType>> {
    Ok(Json(state.product_types().find_by_id(&id)?))
}

/// POST /product-type
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductTypeCreate>,
) -> AppResult<(StatusCode, Json<ProductType>)> {
    let product_type = state.product_types().create(payload)?;
    Ok((StatusCode::CREATED, Json(product_type)))
}
