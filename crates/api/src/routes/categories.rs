//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use prime_drip_core::CategoryId;

use crate::error::Result;
use crate::middleware::AdminUser;
use crate::models::Category;
use crate::response::ApiResponse;
use crate::services::CategoryService;
use crate::state::AppState;

/// Category create/update request body.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub nombre: String,
    pub descripcion: Option<String>,
}

/// Category response body.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub nombre: String,
    pub descripcion: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            nombre: category.name,
            descripcion: category.description,
        }
    }
}

/// `GET /v1/categorias`
pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<CategoryResponse>>> {
    let categories = CategoryService::new(state.pool()).list().await?;
    Ok(ApiResponse::ok(
        categories.into_iter().map(Into::into).collect(),
        "Categories listed",
    ))
}

/// `GET /v1/categorias/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<CategoryResponse>> {
    let category = CategoryService::new(state.pool())
        .get(CategoryId::new(id))
        .await?;
    Ok(ApiResponse::ok(category.into(), "Category found"))
}

/// `POST /v1/categorias` (admin)
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(request): Json<CategoryRequest>,
) -> Result<ApiResponse<CategoryResponse>> {
    let category = CategoryService::new(state.pool())
        .create(&request.nombre, request.descripcion.as_deref())
        .await?;
    Ok(ApiResponse::created(category.into(), "Category created"))
}

/// `PUT /v1/categorias/{id}` (admin)
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CategoryRequest>,
) -> Result<ApiResponse<CategoryResponse>> {
    let category = CategoryService::new(state.pool())
        .update(
            CategoryId::new(id),
            &request.nombre,
            request.descripcion.as_deref(),
        )
        .await?;
    Ok(ApiResponse::ok(category.into(), "Category updated"))
}

/// `DELETE /v1/categorias/{id}` (admin)
pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>> {
    CategoryService::new(state.pool())
        .delete(CategoryId::new(id))
        .await?;
    Ok(ApiResponse::ok((), "Category deleted"))
}
