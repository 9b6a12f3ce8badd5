//! Category model.

use prime_drip_core::CategoryId;

/// A product category.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}
