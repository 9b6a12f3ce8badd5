//! Cart repository for database operations.
//!
//! Every mutating statement re-validates ownership (user id or session token
//! match) in the statement itself rather than as a separate read, so there is
//! no window between check and use under concurrent requests.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Row, SqlitePool};

use prime_drip_core::{CartId, CartItemId, ProductId, UserId};

use super::{RepositoryError, parse_money};
use crate::models::{Cart, CartLine, CartOwner, CartWithItems};

/// Repository for cart and line-item database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new cart for the given owner, returning its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, owner: &CartOwner) -> Result<CartId, RepositoryError> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO carts (user_id, session_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            RETURNING id
            ",
        )
        .bind(owner.user_id())
        .bind(owner.session_id())
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(CartId::new(id))
    }

    /// Reassign a session-owned cart to a user, clearing the session token.
    ///
    /// Returns `true` if a row was updated, `false` if the cart does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn claim(&self, cart_id: CartId, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE carts
            SET user_id = ?1, session_id = NULL, updated_at = ?2
            WHERE id = ?3
            ",
        )
        .bind(user_id)
        .bind(Utc::now())
        .bind(cart_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Look up the cart id owned by a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_user(&self, user_id: UserId) -> Result<Option<CartId>, RepositoryError> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM carts WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(id.map(CartId::new))
    }

    /// Fetch a cart and all its line items in one ownership-scoped read.
    ///
    /// The outer join means an empty cart still resolves (with zero items).
    /// Returns `None` if the cart does not exist or neither credential
    /// matches the stored owner; a `NULL` credential never matches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn fetch_with_items(
        &self,
        cart_id: CartId,
        user_id: Option<UserId>,
        session_id: Option<&str>,
    ) -> Result<Option<CartWithItems>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT
                c.id AS cart_id,
                c.user_id,
                c.session_id,
                c.created_at,
                c.updated_at,
                ci.id AS item_id,
                ci.product_id,
                ci.quantity,
                ci.unit_price,
                ci.added_at,
                p.name AS product_name,
                p.image_url AS product_image_url,
                p.brand,
                p.stock,
                p.category_id
            FROM carts c
            LEFT JOIN cart_items ci ON ci.cart_id = c.id
            LEFT JOIN products p ON p.id = ci.product_id
            WHERE c.id = ?1
              AND (c.user_id = ?2 OR c.session_id = ?3)
            ",
        )
        .bind(cart_id)
        .bind(user_id)
        .bind(session_id)
        .fetch_all(self.pool)
        .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let created_at: DateTime<Utc> = first.try_get("created_at")?;
        let updated_at: DateTime<Utc> = first.try_get("updated_at")?;
        let cart = Cart {
            id: first.try_get("cart_id")?,
            user_id: first.try_get("user_id")?,
            session_id: first.try_get("session_id")?,
            created_at,
            updated_at,
        };

        let mut items = Vec::new();
        for row in &rows {
            // NULL item id means the outer join matched an empty cart
            let item_id: Option<i64> = row.try_get("item_id")?;
            let Some(item_id) = item_id else {
                continue;
            };

            let unit_price_raw: String = row.try_get("unit_price")?;
            let added_at: DateTime<Utc> = row.try_get("added_at")?;
            items.push(CartLine {
                id: CartItemId::new(item_id),
                cart_id: cart.id,
                product_id: row.try_get("product_id")?,
                product_name: row.try_get("product_name")?,
                product_image_url: row.try_get("product_image_url")?,
                brand: row.try_get("brand")?,
                stock: row.try_get("stock")?,
                category_id: row.try_get("category_id")?,
                quantity: row.try_get("quantity")?,
                unit_price: parse_money(&unit_price_raw)?,
                added_at,
            });
        }

        Ok(Some(CartWithItems { cart, items }))
    }

    /// Atomically add a line item, merging quantities on a duplicate
    /// (cart, product) key.
    ///
    /// A single upsert statement performs insert-or-merge so concurrent adds
    /// of the same product cannot lose updates: the new quantity is added to
    /// the stored one and the unit price is overwritten with the supplied
    /// value. Returns the line item id (existing or new).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn upsert_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<CartItemId, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity, unit_price, added_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (cart_id, product_id) DO UPDATE SET
                quantity = quantity + excluded.quantity,
                unit_price = excluded.unit_price
            RETURNING id
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price.to_string())
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(CartItemId::new(id))
    }

    /// Set a line item's quantity, scoped to cart, product, and ownership in
    /// one conditional statement.
    ///
    /// Returns `false` if no row matched (wrong owner or missing line item).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn update_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i64,
        user_id: Option<UserId>,
        session_id: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items
            SET quantity = ?1
            WHERE cart_id = ?2
              AND product_id = ?3
              AND EXISTS (
                  SELECT 1 FROM carts c
                  WHERE c.id = cart_items.cart_id
                    AND (c.user_id = ?4 OR c.session_id = ?5)
              )
            ",
        )
        .bind(quantity)
        .bind(cart_id)
        .bind(product_id)
        .bind(user_id)
        .bind(session_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a line item under the same ownership-match discipline as
    /// [`update_quantity`](Self::update_quantity).
    ///
    /// Returns `false` if no row matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        user_id: Option<UserId>,
        session_id: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE cart_id = ?1
              AND product_id = ?2
              AND EXISTS (
                  SELECT 1 FROM carts c
                  WHERE c.id = cart_items.cart_id
                    AND (c.user_id = ?3 OR c.session_id = ?4)
              )
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(user_id)
        .bind(session_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
