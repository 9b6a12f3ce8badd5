//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use chrono::{DateTime, Utc};
use prime_drip_core::{CategoryId, ProductId};

use crate::db::products::NewProduct;
use crate::error::Result;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::{Product, ProductAudience, ProductTag};
use crate::response::ApiResponse;
use crate::services::ProductService;
use crate::state::AppState;

/// Product create/update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub stock: i64,
    pub marca: String,
    pub imagen_url: String,
    pub activo: bool,
    pub categoria_id: CategoryId,
    pub etiqueta: Option<ProductTag>,
    pub sexo: Option<ProductAudience>,
    pub is_featured: Option<bool>,
}

/// Product response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub stock: i64,
    pub marca: String,
    pub imagen_url: String,
    pub activo: bool,
    pub categoria_id: CategoryId,
    pub etiqueta: Option<ProductTag>,
    pub sexo: Option<ProductAudience>,
    pub is_featured: bool,
    pub fecha_creacion: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            nombre: product.name,
            descripcion: product.description,
            precio: product.price,
            stock: product.stock,
            marca: product.brand,
            imagen_url: product.image_url,
            activo: product.active,
            categoria_id: product.category_id,
            etiqueta: product.tag,
            sexo: product.audience,
            is_featured: product.is_featured,
            fecha_creacion: product.created_at,
        }
    }
}

fn to_responses(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(Into::into).collect()
}

/// `GET /v1/productos` (admin)
pub async fn list_all(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ProductResponse>>> {
    let products = ProductService::new(state.pool(), state.storage())
        .list_all()
        .await?;
    Ok(ApiResponse::ok(to_responses(products), "Products listed"))
}

/// `GET /v1/productos/activos`
pub async fn list_active(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ProductResponse>>> {
    let products = ProductService::new(state.pool(), state.storage())
        .list_active()
        .await?;
    Ok(ApiResponse::ok(to_responses(products), "Products listed"))
}

/// `GET /v1/productos/categoria/{id}`
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Vec<ProductResponse>>> {
    let products = ProductService::new(state.pool(), state.storage())
        .list_by_category(CategoryId::new(id))
        .await?;
    Ok(ApiResponse::ok(to_responses(products), "Products listed"))
}

/// `GET /v1/productos/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<ProductResponse>> {
    let product = ProductService::new(state.pool(), state.storage())
        .get(ProductId::new(id))
        .await?;
    Ok(ApiResponse::ok(product.into(), "Product found"))
}

/// `POST /v1/productos` (authenticated)
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> Result<ApiResponse<ProductResponse>> {
    let product = ProductService::new(state.pool(), state.storage())
        .create(&NewProduct {
            name: &request.nombre,
            description: request.descripcion.as_deref(),
            price: request.precio,
            stock: request.stock,
            brand: &request.marca,
            image_url: &request.imagen_url,
            active: request.activo,
            category_id: request.categoria_id,
            tag: request.etiqueta,
            is_featured: request.is_featured.unwrap_or(false),
            audience: request.sexo,
        })
        .await?;
    Ok(ApiResponse::created(product.into(), "Product created"))
}

/// `PUT /v1/productos/{id}` (authenticated)
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ProductRequest>,
) -> Result<ApiResponse<ProductResponse>> {
    let service = ProductService::new(state.pool(), state.storage());
    let existing = service.get(ProductId::new(id)).await?;

    let product = service
        .update(&Product {
            id: existing.id,
            name: request.nombre,
            description: request.descripcion,
            price: request.precio,
            stock: request.stock,
            brand: request.marca,
            image_url: request.imagen_url,
            active: request.activo,
            category_id: request.categoria_id,
            tag: request.etiqueta,
            is_featured: request.is_featured.unwrap_or(false),
            audience: request.sexo,
            created_at: existing.created_at,
        })
        .await?;
    Ok(ApiResponse::ok(product.into(), "Product updated"))
}

/// `DELETE /v1/productos/{id}` (admin)
pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<bool>> {
    ProductService::new(state.pool(), state.storage())
        .delete(ProductId::new(id))
        .await?;
    Ok(ApiResponse::ok(true, "Product deleted"))
}
