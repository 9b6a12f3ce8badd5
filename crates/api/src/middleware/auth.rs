//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a bearer token (or an admin bearer
//! token) in route handlers. Verification is stateless: the token itself
//! carries the user id and roles.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use prime_drip_core::UserId;

use crate::error::ApiError;
use crate::models::Role;
use crate::services::{Claims, auth::verify_token};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.claims.email)
/// }
/// ```
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    /// The authenticated user's id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.claims.sub)
    }
}

/// Extractor that additionally requires the admin role.
pub struct AdminUser {
    pub claims: Claims,
}

impl AdminUser {
    /// The authenticated admin's id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.claims.sub)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn claims_from_parts(parts: &Parts, state: &AppState) -> Result<Claims, ApiError> {
    let token = bearer_token(parts)
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_owned()))?;

    verify_token(token, &state.config().jwt)
        .map_err(|_| ApiError::Unauthorized("invalid or expired token".to_owned()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state)?;
        Ok(Self { claims })
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state)?;
        if !claims.roles.contains(&Role::Admin) {
            return Err(ApiError::Forbidden("admin role required".to_owned()));
        }
        Ok(Self { claims })
    }
}
