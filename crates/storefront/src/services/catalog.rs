//! Catalog service.

use sqlx::PgPool;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::models::Product;

/// Errors from catalog reads.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Read-only access to the product catalog.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// All products, or only those in `category` when given.
    ///
    /// A blank category is treated as no filter.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_products(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Product>, CatalogError> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        Ok(self.products.list(category).await?)
    }

    /// Distinct categories, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.products.categories().await?)
    }
}
