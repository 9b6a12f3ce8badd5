//! Cart route handlers.
//!
//! Cart endpoints are public: guests operate on session-owned carts before
//! they ever log in. Ownership is proven by credential match, not by token.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prime_drip_core::{CartId, CartItemId, CategoryId, ProductId, UserId};

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CartLine, CartWithItems};
use crate::response::ApiResponse;
use crate::services::CartService;
use crate::state::AppState;

/// Cart creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartRequest {
    pub usuario_id: Option<UserId>,
    pub session_id: Option<String>,
}

/// Cart response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub carrito_id: CartId,
    pub usuario_id: Option<UserId>,
    pub session_id: Option<String>,
    pub items: Vec<CartLineResponse>,
    pub fecha_creacion: Option<DateTime<Utc>>,
    pub fecha_actualizacion: Option<DateTime<Utc>>,
}

/// Cart line item response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub id: CartItemId,
    pub carrito_id: CartId,
    pub producto_id: ProductId,
    pub producto_nombre: Option<String>,
    pub producto_imagen_url: Option<String>,
    pub cantidad: i64,
    pub precio_unitario: Decimal,
    pub marca: Option<String>,
    pub stock: Option<i64>,
    pub categoria_id: Option<CategoryId>,
    pub fecha_agregado: DateTime<Utc>,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            id: line.id,
            carrito_id: line.cart_id,
            producto_id: line.product_id,
            producto_nombre: line.product_name,
            producto_imagen_url: line.product_image_url,
            cantidad: line.quantity,
            precio_unitario: line.unit_price,
            marca: line.brand,
            stock: line.stock,
            categoria_id: line.category_id,
            fecha_agregado: line.added_at,
        }
    }
}

impl From<CartWithItems> for CartResponse {
    fn from(cart: CartWithItems) -> Self {
        Self {
            carrito_id: cart.cart.id,
            usuario_id: cart.cart.user_id,
            session_id: cart.cart.session_id,
            items: cart.items.into_iter().map(Into::into).collect(),
            fecha_creacion: Some(cart.cart.created_at),
            fecha_actualizacion: Some(cart.cart.updated_at),
        }
    }
}

/// Query parameters for fetching a cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCartQuery {
    pub carrito_id: CartId,
    pub usuario_id: Option<UserId>,
    pub session_id: Option<String>,
}

/// Query parameters for claiming a cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCartQuery {
    pub carrito_id: CartId,
    pub usuario_id: UserId,
}

/// `GET /v1/carrito`
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<GetCartQuery>,
) -> Result<ApiResponse<CartResponse>> {
    let cart = CartService::new(state.pool())
        .get_cart(
            query.carrito_id,
            query.usuario_id,
            query.session_id.as_deref(),
        )
        .await?;
    Ok(ApiResponse::ok(cart.into(), "Cart fetched"))
}

/// `POST /v1/carrito`
///
/// Creates a cart for the supplied owner. Anonymous callers get a freshly
/// minted session token back; they must send it on every later request.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateCartRequest>,
) -> Result<ApiResponse<CartResponse>> {
    let (cart_id, owner) = CartService::new(state.pool())
        .create_cart(request.usuario_id, request.session_id)
        .await?;

    Ok(ApiResponse::ok(
        CartResponse {
            carrito_id: cart_id,
            usuario_id: owner.user_id(),
            session_id: owner.session_id().map(ToOwned::to_owned),
            items: Vec::new(),
            fecha_creacion: None,
            fecha_actualizacion: None,
        },
        "Cart created",
    ))
}

/// `PUT /v1/carrito`
///
/// Binds a guest cart to a user after login. A missing cart is reported
/// through the envelope (`success: false`, 400) rather than the error path.
pub async fn claim(
    State(state): State<AppState>,
    Query(query): Query<ClaimCartQuery>,
) -> Result<ApiResponse<bool>> {
    let claimed = CartService::new(state.pool())
        .claim_cart(query.carrito_id, query.usuario_id)
        .await?;

    if claimed {
        Ok(ApiResponse::ok(true, "Cart claimed"))
    } else {
        Ok(ApiResponse::bad_request(false, "Cart could not be claimed"))
    }
}

/// `GET /v1/carrito/usuario` (authenticated)
///
/// Looks up the caller's cart id after login, so the client can claim or
/// fetch it.
pub async fn find_own(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Option<CartId>>> {
    let cart_id = CartService::new(state.pool())
        .find_cart_id(user.user_id())
        .await?;
    Ok(ApiResponse::ok(cart_id, "Cart id fetched"))
}
