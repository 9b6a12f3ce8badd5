//! Cart line-item route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prime_drip_core::{CartId, CartItemId, ProductId, UserId};

use crate::error::Result;
use crate::response::ApiResponse;
use crate::services::CartService;
use crate::state::AppState;

/// Add-item request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub carrito_id: CartId,
    pub producto_id: ProductId,
    pub cantidad: i64,
    pub precio_unitario: Decimal,
}

/// Add-item response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemResponse {
    pub id: CartItemId,
    pub carrito_id: CartId,
    pub producto_id: ProductId,
    pub cantidad: i64,
}

/// Update-quantity request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub carrito_id: CartId,
    pub producto_id: ProductId,
    pub cantidad: i64,
    pub usuario_id: Option<UserId>,
    pub session_id: Option<String>,
}

/// Remove-item request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub carrito_id: CartId,
    pub producto_id: ProductId,
    pub usuario_id: Option<UserId>,
    pub session_id: Option<String>,
}

/// `POST /v1/detalle-carrito`
///
/// Adds a product to a cart. Re-adding a product merges quantities in one
/// atomic upsert, so the returned id is the existing line's on a merge.
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<ApiResponse<AddItemResponse>> {
    let id = CartService::new(state.pool())
        .add_item(
            request.carrito_id,
            request.producto_id,
            request.cantidad,
            request.precio_unitario,
        )
        .await?;

    Ok(ApiResponse::ok(
        AddItemResponse {
            id,
            carrito_id: request.carrito_id,
            producto_id: request.producto_id,
            cantidad: request.cantidad,
        },
        "Cart item added",
    ))
}

/// `PUT /v1/detalle-carrito`
///
/// Sets a line item's quantity. A miss (wrong owner, unknown line) is
/// reported through the envelope as `success: false` with a 400.
pub async fn update_quantity(
    State(state): State<AppState>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<ApiResponse<bool>> {
    let updated = CartService::new(state.pool())
        .update_item_quantity(
            request.carrito_id,
            request.producto_id,
            request.cantidad,
            request.usuario_id,
            request.session_id.as_deref(),
        )
        .await?;

    if updated {
        Ok(ApiResponse::ok(true, "Cart item quantity updated"))
    } else {
        Ok(ApiResponse::bad_request(false, "Cart item could not be updated"))
    }
}

/// `DELETE /v1/detalle-carrito`
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveItemRequest>,
) -> Result<ApiResponse<bool>> {
    let removed = CartService::new(state.pool())
        .remove_item(
            request.carrito_id,
            request.producto_id,
            request.usuario_id,
            request.session_id.as_deref(),
        )
        .await?;

    if removed {
        Ok(ApiResponse::ok(true, "Cart item removed"))
    } else {
        Ok(ApiResponse::bad_request(false, "Cart item could not be removed"))
    }
}
