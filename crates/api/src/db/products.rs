//! Product repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use prime_drip_core::{CategoryId, ProductId};

use super::{RepositoryError, parse_money};
use crate::models::{Product, ProductAudience, ProductTag};

const SELECT_COLUMNS: &str = "id, name, description, price, stock, brand, image_url, active, \
                              category_id, tag, is_featured, audience, created_at";

/// Fields for a product insert; the id and creation timestamp are assigned
/// by the repository.
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: rust_decimal::Decimal,
    pub stock: i64,
    pub brand: &'a str,
    pub image_url: &'a str,
    pub active: bool,
    pub category_id: CategoryId,
    pub tag: Option<ProductTag>,
    pub is_featured: bool,
    pub audience: Option<ProductAudience>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM products ORDER BY created_at DESC");
        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        rows.iter().map(map_product).collect()
    }

    /// List products filtered by the active flag, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_active(&self, active: bool) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE active = ?1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql).bind(active).fetch_all(self.pool).await?;
        rows.iter().map(map_product).collect()
    }

    /// List products in a category, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE category_id = ?1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(category_id)
            .fetch_all(self.pool)
            .await?;
        rows.iter().map(map_product).collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM products WHERE id = ?1");
        let row = sqlx::query(&sql).bind(id).fetch_optional(self.pool).await?;
        row.as_ref().map(map_product).transpose()
    }

    /// Insert a new product, returning it with the assigned id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct<'_>) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO products
                (name, description, price, stock, brand, image_url, active,
                 category_id, tag, is_featured, audience, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            RETURNING id
            ",
        )
        .bind(new.name)
        .bind(new.description)
        .bind(new.price.to_string())
        .bind(new.stock)
        .bind(new.brand)
        .bind(new.image_url)
        .bind(new.active)
        .bind(new.category_id)
        .bind(new.tag.map(ProductTag::as_str))
        .bind(new.is_featured)
        .bind(new.audience.map(ProductAudience::as_str))
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(Product {
            id: ProductId::new(id),
            name: new.name.to_owned(),
            description: new.description.map(str::to_owned),
            price: new.price,
            stock: new.stock,
            brand: new.brand.to_owned(),
            image_url: new.image_url.to_owned(),
            active: new.active,
            category_id: new.category_id,
            tag: new.tag,
            is_featured: new.is_featured,
            audience: new.audience,
            created_at: now,
        })
    }

    /// Update a product.
    ///
    /// Returns `true` if a row was updated, `false` if the product does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(&self, product: &Product) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = ?1, description = ?2, price = ?3, stock = ?4, brand = ?5,
                image_url = ?6, active = ?7, category_id = ?8, tag = ?9,
                is_featured = ?10, audience = ?11
            WHERE id = ?12
            ",
        )
        .bind(&product.name)
        .bind(product.description.as_deref())
        .bind(product.price.to_string())
        .bind(product.stock)
        .bind(&product.brand)
        .bind(&product.image_url)
        .bind(product.active)
        .bind(product.category_id)
        .bind(product.tag.map(ProductTag::as_str))
        .bind(product.is_featured)
        .bind(product.audience.map(ProductAudience::as_str))
        .bind(product.id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a product.
    ///
    /// Returns `true` if a row was deleted, `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let price_raw: String = row.try_get("price")?;
    let tag_raw: Option<String> = row.try_get("tag")?;
    let audience_raw: Option<String> = row.try_get("audience")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    let tag = tag_raw
        .map(|s| {
            ProductTag::from_str_opt(&s).ok_or_else(|| {
                RepositoryError::DataCorruption(format!("unknown product tag: {s}"))
            })
        })
        .transpose()?;
    let audience = audience_raw
        .map(|s| {
            ProductAudience::from_str_opt(&s).ok_or_else(|| {
                RepositoryError::DataCorruption(format!("unknown product audience: {s}"))
            })
        })
        .transpose()?;

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: parse_money(&price_raw)?,
        stock: row.try_get("stock")?,
        brand: row.try_get("brand")?,
        image_url: row.try_get("image_url")?,
        active: row.try_get("active")?,
        category_id: row.try_get("category_id")?,
        tag,
        is_featured: row.try_get("is_featured")?,
        audience,
        created_at,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    async fn seed_category(pool: &sqlx::SqlitePool, name: &str) -> CategoryId {
        crate::db::categories::CategoryRepository::new(pool)
            .create(name, None)
            .await
            .unwrap()
    }

    fn sample<'a>(name: &'a str, active: bool, category_id: CategoryId) -> NewProduct<'a> {
        NewProduct {
            name,
            description: None,
            price: Decimal::from_str("59.90").unwrap(),
            stock: 10,
            brand: "Drip",
            image_url: "/uploads/images/x.jpg",
            active,
            category_id,
            tag: Some(ProductTag::New),
            is_featured: false,
            audience: Some(ProductAudience::Unisex),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        let category = seed_category(&pool, "Shirts").await;

        let created = repo.create(&sample("Tee", true, category)).await.unwrap();
        let got = repo.get(created.id).await.unwrap().unwrap();

        assert_eq!(got.name, "Tee");
        assert_eq!(got.price, Decimal::from_str("59.90").unwrap());
        assert_eq!(got.tag, Some(ProductTag::New));
        assert_eq!(got.audience, Some(ProductAudience::Unisex));
    }

    #[tokio::test]
    async fn test_active_filter() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        let category = seed_category(&pool, "Shirts").await;

        repo.create(&sample("Visible", true, category)).await.unwrap();
        repo.create(&sample("Hidden", false, category)).await.unwrap();

        let active = repo.list_by_active(true).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Visible");

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_category_filter() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let shirts = seed_category(&pool, "Shirts").await;
        let shoes = seed_category(&pool, "Shoes").await;

        repo.create(&sample("A", true, shirts)).await.unwrap();
        repo.create(&sample("B", true, shoes)).await.unwrap();

        let in_one = repo.list_by_category(shirts).await.unwrap();
        assert_eq!(in_one.len(), 1);
        assert_eq!(in_one[0].name, "A");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        let category = seed_category(&pool, "Shirts").await;

        let mut product = repo.create(&sample("Tee", true, category)).await.unwrap();
        product.stock = 3;
        product.tag = Some(ProductTag::LastUnits);
        assert!(repo.update(&product).await.unwrap());

        let got = repo.get(product.id).await.unwrap().unwrap();
        assert_eq!(got.stock, 3);
        assert_eq!(got.tag, Some(ProductTag::LastUnits));

        assert!(repo.delete(product.id).await.unwrap());
        assert!(!repo.delete(product.id).await.unwrap());
    }
}
