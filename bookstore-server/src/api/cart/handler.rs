//! Cart API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::{CartItemRequest, CartMergeRequest, CartView};

/// GET /cart - items with live prices and totals
pub async fn view(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<CartView>> {
    Ok(Json(state.carts().view(&current_user.id)?))
}

/// POST /cart/item - add, or raise the quantity of an existing line
pub async fn add_item(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CartItemRequest>,
) -> AppResult<Json<CartView>> {
    Ok(Json(state.carts().add_item(&current_user.id, &payload)?))
}

/// DELETE /cart/item - lower the quantity; the line goes at zero
pub async fn remove_item(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CartItemRequest>,
) -> AppResult<Json<CartView>> {
    Ok(Json(state.carts().remove_item(&current_user.id, &payload)?))
}

/// POST /cart/merge - fold a guest cart into the caller's
pub async fn merge(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CartMergeRequest>,
) -> AppResult<Json<CartView>> {
    Ok(Json(state.carts().merge(&current_user.id, &payload.items)?))
}

/// DELETE /cart
pub async fn clear(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<CartView>> {
    Ok(Json(state.carts().clear(&current_user.id)?))
}
