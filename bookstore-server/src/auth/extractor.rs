//! Request user extractors
//!
//! [`CurrentUser`] requires a valid token; [`OptionalUser`] lets guests
//! through but still rejects a bad token when one is sent.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, User};

use crate::core::ServerState;

/// Authenticated caller, re-read from the store on every request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
    pub email: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Seller or admin
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Seller | Role::Admin)
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Acting on `user_id` is allowed for that user and for admins
    pub fn ensure_self_or_admin(&self, user_id: &str) -> Result<(), AppError> {
        if self.id == user_id || self.is_admin() {
            return Ok(());
        }
        Err(AppError::new(ErrorCode::PermissionDenied).with_id(user_id))
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            role: user.role,
            email: user.email.clone(),
        }
    }
}

fn authorization(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // already resolved by require_auth
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }
        let user = state.auth().authenticate(authorization(parts))?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Caller if a token was sent, `None` for guests
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequestParts<ServerState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let user =
            <CurrentUser as OptionalFromRequestParts<ServerState>>::from_request_parts(parts, state)
                .await?;
        Ok(Self(user))
    }
}

impl OptionalFromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if authorization(parts).is_none() {
            return Ok(None);
        }
        <CurrentUser as FromRequestParts<ServerState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}
