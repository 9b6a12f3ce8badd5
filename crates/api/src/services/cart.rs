//! Shopping cart service.
//!
//! A cart is owned by exactly one principal: a registered user or an
//! anonymous session token. Callers supply whichever credential they hold;
//! supplying both is rejected, and supplying neither on cart creation mints
//! a fresh session token for the guest.

use sqlx::SqlitePool;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use prime_drip_core::{CartId, CartItemId, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::models::{CartOwner, CartWithItems};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Request shape is invalid (bad quantity, conflicting credentials).
    #[error("{0}")]
    Validation(String),

    /// The cart does not exist or the credential does not match its owner.
    #[error("cart not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Shopping cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            carts: CartRepository::new(pool),
        }
    }

    /// Create a cart for the given owner.
    ///
    /// An anonymous caller (neither credential) gets a freshly minted session
    /// token; the returned owner carries whichever credential now holds the
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` if both credentials are supplied.
    pub async fn create_cart(
        &self,
        user_id: Option<UserId>,
        session_id: Option<String>,
    ) -> Result<(CartId, CartOwner), CartError> {
        let owner = match (user_id, session_id) {
            (Some(_), Some(_)) => {
                return Err(CartError::Validation(
                    "supply either a user id or a session id, not both".to_owned(),
                ));
            }
            (Some(user_id), None) => CartOwner::User(user_id),
            (None, Some(session_id)) => CartOwner::Session(session_id),
            (None, None) => CartOwner::Session(Uuid::new_v4().to_string()),
        };

        let cart_id = self.carts.create(&owner).await?;
        debug!(cart_id = %cart_id, "cart created");
        Ok((cart_id, owner))
    }

    /// Bind a guest cart to a user after login, clearing its session token.
    ///
    /// Returns `false` if the cart does not exist; callers report that
    /// through the envelope rather than as an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the update fails.
    pub async fn claim_cart(&self, cart_id: CartId, user_id: UserId) -> Result<bool, CartError> {
        let claimed = self.carts.claim(cart_id, user_id).await?;
        if claimed {
            debug!(cart_id = %cart_id, user_id = %user_id, "guest cart claimed");
        }
        Ok(claimed)
    }

    /// Look up the cart id owned by a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn find_cart_id(&self, user_id: UserId) -> Result<Option<CartId>, CartError> {
        Ok(self.carts.find_by_user(user_id).await?)
    }

    /// Fetch a cart with its line items.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` if no credential is supplied or both
    /// are.
    /// Returns `CartError::NotFound` if the cart does not exist or the
    /// credential does not match its owner.
    pub async fn get_cart(
        &self,
        cart_id: CartId,
        user_id: Option<UserId>,
        session_id: Option<&str>,
    ) -> Result<CartWithItems, CartError> {
        validate_exclusive(user_id, session_id)?;
        if user_id.is_none() && session_id.is_none() {
            return Err(CartError::Validation(
                "a user id or session id is required".to_owned(),
            ));
        }

        self.carts
            .fetch_with_items(cart_id, user_id, session_id)
            .await?
            .ok_or(CartError::NotFound)
    }

    /// Add a product to a cart, merging quantities when the product is
    /// already in it.
    ///
    /// The merge happens in one atomic upsert, so concurrent adds of the
    /// same product accumulate instead of overwriting each other. Returns
    /// the line item id.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` if the quantity is not positive.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<CartItemId, CartError> {
        validate_quantity(quantity)?;
        Ok(self
            .carts
            .upsert_item(cart_id, product_id, quantity, unit_price)
            .await?)
    }

    /// Set a line item's quantity.
    ///
    /// Returns `false` if no line item matched the cart, product, and owner
    /// credential.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` if the quantity is not positive or
    /// both credentials are supplied.
    pub async fn update_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i64,
        user_id: Option<UserId>,
        session_id: Option<&str>,
    ) -> Result<bool, CartError> {
        validate_exclusive(user_id, session_id)?;
        validate_quantity(quantity)?;

        Ok(self
            .carts
            .update_quantity(cart_id, product_id, quantity, user_id, session_id)
            .await?)
    }

    /// Remove a line item.
    ///
    /// Returns `false` if no line item matched the cart, product, and owner
    /// credential.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` if both credentials are supplied.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        user_id: Option<UserId>,
        session_id: Option<&str>,
    ) -> Result<bool, CartError> {
        validate_exclusive(user_id, session_id)?;

        Ok(self
            .carts
            .delete_item(cart_id, product_id, user_id, session_id)
            .await?)
    }
}

fn validate_exclusive(user_id: Option<UserId>, session_id: Option<&str>) -> Result<(), CartError> {
    if user_id.is_some() && session_id.is_some() {
        return Err(CartError::Validation(
            "supply either a user id or a session id, not both".to_owned(),
        ));
    }
    Ok(())
}

fn validate_quantity(quantity: i64) -> Result<(), CartError> {
    if quantity <= 0 {
        return Err(CartError::Validation(
            "quantity must be greater than zero".to_owned(),
        ));
    }
    Ok(())
}
