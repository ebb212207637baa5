//! User API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::blocking;
use shared::error::AppResult;
use shared::models::{UserPublic, UserUpdate};
use shared::query::ListQuery;

/// GET /user - all active users
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<UserPublic>>> {
    Ok(Json(state.users().find_all(&query)?))
}

/// GET /user/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserPublic>> {
    current_user.ensure_self_or_admin(&id)?;
    let user = state.users().find_by_id(&id)?;
    Ok(Json(UserPublic::from(&user)))
}

/// PATCH /user/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserPublic>> {
    current_user.ensure_self_or_admin(&id)?;
    let users = state.users();
    let allow_role_change = current_user.is_admin();
    let user_id = id.clone();
    // a password change runs PBKDF2
    let user = blocking(move || users.update(&user_id, payload, allow_role_change)).await??;
    tracing::info!(user_id = %id, by = %current_user.id, "User updated");
    Ok(Json(UserPublic::from(&user)))
}

/// DELETE /user/{id} - soft delete with the cart
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    current_user.ensure_self_or_admin(&id)?;
    state.users().delete(&id)?;
    tracing::info!(user_id = %id, by = %current_user.id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
