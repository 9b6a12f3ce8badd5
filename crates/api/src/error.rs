//! Unified error handling.
//!
//! Provides a unified `ApiError` type mapped onto the JSON error envelope the
//! frontend consumes. All route handlers return `Result<T, ApiError>`.
//!
//! The envelope carries the request path, which is only known to middleware.
//! `IntoResponse` therefore builds the body with an empty path and stashes a
//! copy in the response extensions; `middleware::error_envelope` fills the
//! path in before the response leaves the stack.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CartError, CatalogError, StorageError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Validation(msg) => Self::BadRequest(msg),
            CartError::NotFound => Self::NotFound("cart not found".to_owned()),
            CartError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => Self::BadRequest(msg),
            CatalogError::NotFound => Self::NotFound("resource not found".to_owned()),
            CatalogError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidContentType(_) | StorageError::TooLarge => {
                Self::BadRequest(err.to_string())
            }
            StorageError::InvalidPath => Self::BadRequest("invalid image url".to_owned()),
            StorageError::Io(e) => Self::Internal(e.to_string()),
        }
    }
}

/// JSON error envelope returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub success: bool,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidToken => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserAlreadyExists
                | AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_)
                | AuthError::PasswordHash
                | AuthError::TokenGeneration => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::InvalidToken => "Invalid or expired token".to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::Repository(_)
                | AuthError::PasswordHash
                | AuthError::TokenGeneration => "Internal server error".to_string(),
            },
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg) => msg.clone(),
        };

        let body = ErrorBody {
            timestamp: Utc::now(),
            status: status.as_u16(),
            success: false,
            error: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message,
            path: String::new(),
        };

        let mut response = (status, Json(&body)).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
