//! Image upload route handlers (admin only).

use axum::extract::{Multipart, Query, State};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::middleware::AdminUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Upload response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
}

/// Query parameters for image deletion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageQuery {
    pub image_url: String,
}

/// `POST /v1/upload/product-image` (admin)
///
/// Accepts a multipart form with an `image` field.
pub async fn upload_image(
    _admin: AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ApiResponse<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field
            .content_type()
            .ok_or_else(|| ApiError::BadRequest("missing content type".to_owned()))?
            .to_owned();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let image_url = state
            .storage()
            .save(&original_name, &content_type, &data)
            .await?;

        return Ok(ApiResponse::ok(
            UploadResponse { image_url },
            "Image uploaded",
        ));
    }

    Err(ApiError::BadRequest("missing 'image' field".to_owned()))
}

/// `DELETE /v1/upload/delete-image?imageUrl=` (admin)
pub async fn delete_image(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<DeleteImageQuery>,
) -> Result<ApiResponse<bool>> {
    let deleted = state.storage().delete_by_url(&query.image_url).await?;

    if deleted {
        Ok(ApiResponse::ok(true, "Image deleted"))
    } else {
        Ok(ApiResponse::bad_request(false, "Image could not be deleted"))
    }
}
