//! Auth API Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::{AuthResponse, LoginRequest, RestoreRequest, SignupRequest, UserPublic};

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub sent: bool,
}

/// POST /auth/signup - create an account with its cart and sign in
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.auth().signup(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login - email or phone plus password
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state.auth().login(payload).await?;
    Ok(Json(response))
}

/// POST /auth/restore - send a temporary password
pub async fn restore(
    State(state): State<ServerState>,
    Json(payload): Json<RestoreRequest>,
) -> AppResult<Json<RestoreResponse>> {
    state.auth().restore(payload).await?;
    Ok(Json(RestoreResponse { sent: true }))
}

/// GET /auth/me - the caller's profile
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserPublic>> {
    let user = state.users().find_by_id(&current_user.id)?;
    Ok(Json(UserPublic::from(&user)))
}
