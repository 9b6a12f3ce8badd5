//! Category repository for database operations.

use sqlx::{Row, SqlitePool};

use prime_drip_core::CategoryId;

use super::RepositoryError;
use crate::models::Category;

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, description FROM categories ORDER BY name ASC")
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(map_category).collect()
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, description FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(map_category).transpose()
    }

    /// Check whether a category with this name exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_by_name(&self, name: &str) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE name = ?1")
            .bind(name)
            .fetch_one(self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Check whether a *different* category already uses this name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_by_name_excluding(
        &self,
        name: &str,
        id: CategoryId,
    ) -> Result<bool, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE name = ?1 AND id != ?2")
                .bind(name)
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Insert a new category, returning its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate name.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<CategoryId, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name, description) VALUES (?1, ?2) RETURNING id",
        )
        .bind(name)
        .bind(description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("category name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(CategoryId::new(id))
    }

    /// Update a category.
    ///
    /// Returns `true` if a row was updated, `false` if the category does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(&self, category: &Category) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE categories SET name = ?1, description = ?2 WHERE id = ?3")
            .bind(&category.name)
            .bind(category.description.as_deref())
            .bind(category.id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a category.
    ///
    /// Returns `true` if a row was deleted, `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count products that reference a category (used to block deletes).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_referencing_products(
        &self,
        id: CategoryId,
    ) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?1")
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

fn map_category(row: &sqlx::sqlite::SqliteRow) -> Result<Category, RepositoryError> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_list_get() {
        let pool = test_pool().await;
        let repo = CategoryRepository::new(&pool);

        let id = repo.create("Sneakers", Some("Shoes")).await.unwrap();
        repo.create("Hoodies", None).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        // Ordered by name
        assert_eq!(all[0].name, "Hoodies");

        let got = repo.get(id).await.unwrap().unwrap();
        assert_eq!(got.name, "Sneakers");
        assert_eq!(got.description.as_deref(), Some("Shoes"));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let pool = test_pool().await;
        let repo = CategoryRepository::new(&pool);

        repo.create("Sneakers", None).await.unwrap();
        let err = repo.create("Sneakers", None).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_exists_by_name_excluding_self() {
        let pool = test_pool().await;
        let repo = CategoryRepository::new(&pool);

        let a = repo.create("Sneakers", None).await.unwrap();
        let b = repo.create("Hoodies", None).await.unwrap();

        // Own name does not conflict with itself
        assert!(!repo.exists_by_name_excluding("Sneakers", a).await.unwrap());
        // Another category's name does
        assert!(repo.exists_by_name_excluding("Sneakers", b).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let pool = test_pool().await;
        let repo = CategoryRepository::new(&pool);
        assert!(!repo.delete(CategoryId::new(99)).await.unwrap());
    }
}
