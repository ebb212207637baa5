//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::auth::{CurrentUser, OptionalUser};
use crate::core::ServerState;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderCreate, OrderStatusUpdate};
use shared::query::ListQuery;

/// POST /order - checkout for signed-in users and guests
pub async fn create(
    State(state): State<ServerState>,
    OptionalUser(caller): OptionalUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.checkout().place(caller.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /order - the caller's orders; every order for staff
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let owner = (!current_user.is_staff()).then_some(current_user.id.as_str());
    Ok(Json(state.orders().find_all(owner, &query)?))
}

/// GET /order/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders().find_by_id(&id)?;
    if order.user != current_user.id && !current_user.is_staff() {
        return Err(AppError::new(ErrorCode::PermissionDenied).with_id(&id));
    }
    Ok(Json(order))
}

/// PATCH /order/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = state.orders().update_status(&id, payload.status)?;
    tracing::info!(
        order = order.number,
        status = order.status.key.name(),
        by = %current_user.id,
        "Order status changed"
    );
    Ok(Json(order))
}
