//! Review API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::{Review, ReviewCreate};
use shared::query::ListQuery;

/// GET /product/{id}/review
pub async fn list_for_product(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Review>>> {
    Ok(Json(state.reviews().find_by_product(&product_id, &query)?))
}

/// POST /product/{id}/review - rating 1 to 5
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let review = state
        .reviews()
        .create(&product_id, &current_user.id, payload)?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /review/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Review>> {
    Ok(Json(state.reviews().find_by_id(&id)?))
}

/// DELETE /review/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .reviews()
        .delete(&id, &current_user.id, current_user.is_admin())?;
    Ok(StatusCode::NO_CONTENT)
}
