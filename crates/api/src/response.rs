//! JSON success envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Envelope wrapping every successful JSON response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub response_code: u16,
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap `data` in a 200 envelope.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            response_code: StatusCode::OK.as_u16(),
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Wrap `data` in a 201 envelope.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            response_code: StatusCode::CREATED.as_u16(),
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Wrap `data` in a 400 envelope with `success: false`.
    ///
    /// Used where a failed operation is still reported through the regular
    /// envelope rather than the error path, such as claiming a cart that no
    /// longer exists.
    pub fn bad_request(data: T, message: impl Into<String>) -> Self {
        Self {
            response_code: StatusCode::BAD_REQUEST.as_u16(),
            success: false,
            data,
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.response_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_field_names() {
        let body = serde_json::to_value(ApiResponse::ok(vec![1, 2], "listed")).unwrap();
        assert_eq!(body["responseCode"], 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2]));
        assert_eq!(body["message"], "listed");
    }

    #[test]
    fn test_status_follows_response_code() {
        assert_eq!(
            ApiResponse::created((), "made").into_response().status(),
            StatusCode::CREATED
        );
        assert_eq!(
            ApiResponse::bad_request(false, "nope").into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
