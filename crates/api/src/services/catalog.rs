//! Catalog services for categories and products.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::warn;

use prime_drip_core::{CategoryId, ProductId};

use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;
use crate::db::products::{NewProduct, ProductRepository};
use crate::models::{Category, Product};

use super::storage::FileStorage;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request is invalid (duplicate name, category still in use).
    #[error("{0}")]
    Validation(String),

    /// The product does not exist.
    #[error("not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Category management service.
pub struct CategoryService<'a> {
    categories: CategoryRepository<'a>,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
        }
    }

    /// List all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.list().await?)
    }

    /// Fetch a single category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if it does not exist. Missing
    /// categories are reported as bad input rather than 404, since the id
    /// always comes from a client-supplied reference.
    pub async fn get(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.categories
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::Validation("category not found".to_owned()))
    }

    /// Create a category with a unique name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the name is taken.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, CatalogError> {
        if self.categories.exists_by_name(name).await? {
            return Err(CatalogError::Validation(
                "category name already exists".to_owned(),
            ));
        }

        let id = self.categories.create(name, description).await.map_err(|e| {
            match e {
                // Lost a race with a concurrent create of the same name
                RepositoryError::Conflict(msg) => CatalogError::Validation(msg),
                other => CatalogError::Repository(other),
            }
        })?;

        Ok(Category {
            id,
            name: name.to_owned(),
            description: description.map(ToOwned::to_owned),
        })
    }

    /// Update a category, keeping names unique across the other rows.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the new name belongs to another
    /// category or the category does not exist.
    pub async fn update(
        &self,
        id: CategoryId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, CatalogError> {
        if self.categories.exists_by_name_excluding(name, id).await? {
            return Err(CatalogError::Validation(
                "category name already exists".to_owned(),
            ));
        }

        let category = Category {
            id,
            name: name.to_owned(),
            description: description.map(ToOwned::to_owned),
        };
        if !self.categories.update(&category).await? {
            return Err(CatalogError::Validation("category not found".to_owned()));
        }

        Ok(category)
    }

    /// Delete a category that no product references.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` while products still reference it,
    /// or if it does not exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), CatalogError> {
        let referencing = self.categories.count_referencing_products(id).await?;
        if referencing > 0 {
            return Err(CatalogError::Validation(format!(
                "category is referenced by {referencing} product(s)"
            )));
        }

        if !self.categories.delete(id).await? {
            return Err(CatalogError::Validation("category not found".to_owned()));
        }

        Ok(())
    }
}

/// Product management service.
pub struct ProductService<'a> {
    products: ProductRepository<'a>,
    storage: &'a FileStorage,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, storage: &'a FileStorage) -> Self {
        Self {
            products: ProductRepository::new(pool),
            storage,
        }
    }

    /// List every product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list_all().await?)
    }

    /// List active products for the public storefront.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list_by_active(true).await?)
    }

    /// List products belonging to a category. An unknown category yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list_by_category(category_id).await?)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if it does not exist.
    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products.get(id).await?.ok_or(CatalogError::NotFound)
    }

    /// Create a product. Category existence is left to the foreign key.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the insert fails.
    pub async fn create(&self, new: &NewProduct<'_>) -> Result<Product, CatalogError> {
        Ok(self.products.create(new).await?)
    }

    /// Update a product, deleting the previously stored image when the image
    /// URL changed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    pub async fn update(&self, product: &Product) -> Result<Product, CatalogError> {
        let existing = self
            .products
            .get(product.id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        if !self.products.update(product).await? {
            return Err(CatalogError::NotFound);
        }

        if existing.image_url != product.image_url {
            self.delete_image_best_effort(&existing.image_url).await;
        }

        Ok(product.clone())
    }

    /// Delete a product along with its stored image.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let existing = self.products.get(id).await?.ok_or(CatalogError::NotFound)?;

        if !self.products.delete(id).await? {
            return Err(CatalogError::NotFound);
        }

        self.delete_image_best_effort(&existing.image_url).await;
        Ok(())
    }

    /// Image cleanup never fails the catalog operation; a stale file on disk
    /// is preferable to failing a committed delete.
    async fn delete_image_best_effort(&self, image_url: &str) {
        if image_url.is_empty() {
            return;
        }
        if let Err(e) = self.storage.delete_by_url(image_url).await {
            warn!(url = %image_url, error = %e, "failed to delete stored image");
        }
    }
}
