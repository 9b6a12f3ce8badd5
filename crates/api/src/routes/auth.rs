//! Authentication route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Role;
use crate::response::ApiResponse;
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub password: String,
    pub activo: Option<bool>,
}

/// Registration response body.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub nombre: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub token: String,
    pub token_type: String,
}

/// `POST /v1/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<ApiResponse<RegisterResponse>> {
    let service = AuthService::new(state.pool(), &state.config().jwt);
    let user = service
        .register(
            &request.nombre,
            &request.email,
            request.telefono.as_deref(),
            &request.password,
            request.activo.unwrap_or(true),
        )
        .await?;

    Ok(ApiResponse::ok(
        RegisterResponse {
            name: user.name,
            email: user.email.into_inner(),
            message: "user registered".to_owned(),
        },
        "Registration successful",
    ))
}

/// `POST /v1/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>> {
    let service = AuthService::new(state.pool(), &state.config().jwt);
    let outcome = service.login(&request.email, &request.password).await?;

    Ok(ApiResponse::ok(
        LoginResponse {
            nombre: outcome.user.name,
            email: outcome.user.email.into_inner(),
            roles: outcome.roles,
            token: outcome.token,
            token_type: "Bearer".to_owned(),
        },
        "Login successful",
    ))
}
