//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, password login, JWT bearer tokens
//! - `cart` - Shopping cart operations (user- and session-owned carts)
//! - `catalog` - Category and product management
//! - `storage` - Filesystem storage for uploaded product images

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod storage;

pub use auth::{AuthError, AuthService, Claims};
pub use cart::{CartError, CartService};
pub use catalog::{CatalogError, CategoryService, ProductService};
pub use storage::{FileStorage, StorageError};
