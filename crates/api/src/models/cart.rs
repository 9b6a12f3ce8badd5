//! Cart and line-item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use prime_drip_core::{CartId, CartItemId, CategoryId, ProductId, UserId};

/// Who a cart belongs to: an authenticated user or an anonymous session.
///
/// Exactly one of the two is ever set on a stored cart; the database enforces
/// the same exclusivity with a CHECK constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOwner {
    User(UserId),
    Session(String),
}

impl CartOwner {
    /// The user id, if this is a user-owned cart.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(*id),
            Self::Session(_) => None,
        }
    }

    /// The session token, if this is a session-owned cart.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::User(_) => None,
            Self::Session(token) => Some(token),
        }
    }
}

/// A shopping cart header row.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: CartId,
    pub user_id: Option<UserId>,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line item joined with the product fields clients render.
///
/// The product columns are optional because the read is an outer join; a
/// line whose product has since been deleted still resolves.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub product_image_url: Option<String>,
    pub brand: Option<String>,
    pub stock: Option<i64>,
    pub category_id: Option<CategoryId>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub added_at: DateTime<Utc>,
}

/// A cart with all its line items, fetched in a single read.
#[derive(Debug, Clone)]
pub struct CartWithItems {
    pub cart: Cart,
    pub items: Vec<CartLine>,
}
