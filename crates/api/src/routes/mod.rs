//! HTTP route handlers for the shop API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (pings the database)
//!
//! # Auth
//! POST /v1/auth/register           - Register a new account
//! POST /v1/auth/login              - Login, returns a bearer token
//!
//! # Categories
//! GET    /v1/categorias            - List categories
//! GET    /v1/categorias/{id}       - Category detail
//! POST   /v1/categorias            - Create category (admin)
//! PUT    /v1/categorias/{id}       - Update category (admin)
//! DELETE /v1/categorias/{id}       - Delete category (admin)
//!
//! # Products
//! GET    /v1/productos             - List all products (admin)
//! GET    /v1/productos/activos     - List active products
//! GET    /v1/productos/categoria/{id} - List products in a category
//! GET    /v1/productos/{id}        - Product detail
//! POST   /v1/productos             - Create product (authenticated)
//! PUT    /v1/productos/{id}        - Update product (authenticated)
//! DELETE /v1/productos/{id}        - Delete product (admin)
//!
//! # Cart
//! GET  /v1/carrito                 - Fetch a cart with its items
//! POST /v1/carrito                 - Create a cart (user or guest session)
//! PUT  /v1/carrito                 - Bind a guest cart to a user
//! GET  /v1/carrito/usuario         - Find the caller's cart (authenticated)
//!
//! # Cart items
//! POST   /v1/detalle-carrito       - Add an item (merges on duplicate product)
//! PUT    /v1/detalle-carrito       - Set an item's quantity
//! DELETE /v1/detalle-carrito       - Remove an item
//!
//! # Uploads
//! POST   /v1/upload/product-image  - Upload a product image (admin)
//! DELETE /v1/upload/delete-image   - Delete a product image (admin)
//! ```

pub mod auth;
pub mod cart;
pub mod cart_items;
pub mod categories;
pub mod products;
pub mod upload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list_all).post(products::create))
        .route("/activos", get(products::list_active))
        .route("/categoria/{id}", get(products::list_by_category))
        .route(
            "/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::get).post(cart::create).put(cart::claim))
        .route("/usuario", get(cart::find_own))
}

/// Create the cart item routes router.
pub fn cart_item_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        post(cart_items::add)
            .put(cart_items::update_quantity)
            .delete(cart_items::remove),
    )
}

/// Create the upload routes router.
///
/// The body limit is raised above the stored-file cap so oversized
/// uploads reach the storage layer and fail with the API's own error;
/// bodies beyond the limit are rejected with an enveloped 413 by
/// `middleware::error_envelope`.
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/product-image", post(upload::upload_image))
        .route("/delete-image", delete(upload::delete_image))
        .layer(DefaultBodyLimit::max(6 * 1024 * 1024))
}

/// Create all versioned API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/v1/auth", auth_routes())
        .nest("/v1/categorias", category_routes())
        .nest("/v1/productos", product_routes())
        .nest("/v1/carrito", cart_routes())
        .nest("/v1/detalle-carrito", cart_item_routes())
        .nest("/v1/upload", upload_routes())
}
