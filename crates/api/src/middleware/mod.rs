//! HTTP middleware stack.

pub mod auth;

pub use auth::{AdminUser, AuthUser};

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use chrono::Utc;

use crate::error::ErrorBody;

/// Fill the `path` field of error envelopes.
///
/// `ApiError::into_response` cannot see the request URI, so it leaves the
/// path empty and attaches the body to the response extensions. This
/// middleware rebuilds the response with the path filled in.
pub async fn error_envelope(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if let Some(mut body) = response.extensions_mut().remove::<ErrorBody>() {
        body.path = path;
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(body)).into_response();
    }

    // Body-limit rejections come from a layer below the handlers and carry a
    // bare plain-text body; rewrap them so clients always see one shape.
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let status = StatusCode::PAYLOAD_TOO_LARGE;
        let body = ErrorBody {
            timestamp: Utc::now(),
            status: status.as_u16(),
            success: false,
            error: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            message: "Request body too large".to_owned(),
            path,
        };
        return (status, Json(body)).into_response();
    }

    response
}
