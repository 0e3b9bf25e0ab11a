//! Authentication: password hashing, bearer tokens, request extractors.

mod password;
mod token;

pub use password::{hash_password, verify_password};
pub use token::{authenticate, issue, revoke};

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;

/// The authenticated user behind the request's bearer token, plus the token
/// itself so logout can revoke exactly the session that was presented.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated)?;

        let user = token::authenticate(&state.pool, token)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        Ok(CurrentUser {
            user,
            token: token.to_string(),
        })
    }
}

/// Like [`CurrentUser`], but the user must hold the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        if !current.user.is_admin() {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(current.user))
    }
}
