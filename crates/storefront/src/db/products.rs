//! Product catalog repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use grocer_core::ProductId;

use super::RepositoryError;
use crate::models::Product;
use crate::models::product::NewProduct;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    category: String,
    stock: i32,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: ProductId::new(r.id),
            name: r.name,
            description: r.description,
            price: r.price,
            category: r.category,
            stock: r.stock,
            image: r.image,
            created_at: r.created_at,
        }
    }
}

/// Repository for catalog reads and seeding.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products ordered by id, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, category, stock, image, created_at
            FROM grocer.product
            WHERE $1::TEXT IS NULL OR category = $1
            ORDER BY id
            ",
        )
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Distinct categories in alphabetical order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM grocer.product ORDER BY category")
                .fetch_all(self.pool)
                .await?;
        Ok(categories)
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM grocer.product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Insert products in a single transaction.
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// committed in that case.
    pub async fn insert_many(&self, products: &[NewProduct]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for p in products {
            let result = sqlx::query(
                r"
                INSERT INTO grocer.product (name, description, price, category, stock, image)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(p.name)
            .bind(p.description)
            .bind(p.price)
            .bind(p.category)
            .bind(p.stock)
            .bind(p.image)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Change a product's current price.
    ///
    /// Existing order items keep the price they were bought at.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_price(&self, id: ProductId, price: Decimal) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE grocer.product SET price = $2 WHERE id = $1")
            .bind(id)
            .bind(price)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
