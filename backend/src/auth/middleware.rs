//! Authentication extractor
//!
//! Resolves the bearer token on a request into the owning identity using
//! the pre-computed JWT keys from AppState.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

/// Authenticated identity extracted from JWT
///
/// Every document query is scoped by `owner_id`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub owner_id: String,
    pub email: String,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        authenticate(&parts.headers, &app_state)
    }
}

/// Validate the `Authorization: Bearer` header against the JWT service
pub fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<AuthUser, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

    let claims = state
        .jwt()
        .validate_access_token(token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    Ok(AuthUser {
        owner_id: claims.sub,
        email: claims.email,
    })
}
