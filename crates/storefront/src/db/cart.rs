//! Cart line repository.
//!
//! Every statement is scoped by `user_id`, so a line id belonging to another
//! user behaves exactly like a missing one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use grocer_core::{CartLineId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartLine, CartLineView, MAX_LINE_QUANTITY};

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    quantity: i32,
    added_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CartLineViewRow {
    id: i32,
    product_id: i32,
    name: String,
    category: String,
    image: Option<String>,
    unit_price: Decimal,
    quantity: i32,
}

impl From<CartLineRow> for CartLine {
    fn from(r: CartLineRow) -> Self {
        Self {
            id: CartLineId::new(r.id),
            user_id: UserId::new(r.user_id),
            product_id: ProductId::new(r.product_id),
            quantity: r.quantity,
            added_at: r.added_at,
        }
    }
}

impl From<CartLineViewRow> for CartLineView {
    fn from(r: CartLineViewRow) -> Self {
        Self {
            id: CartLineId::new(r.id),
            product_id: ProductId::new(r.product_id),
            name: r.name,
            category: r.category,
            image: r.image,
            unit_price: r.unit_price,
            quantity: r.quantity,
        }
    }
}

const LINE_VIEW_SQL: &str = r"
    SELECT cl.id, cl.product_id, p.name, p.category, p.image, p.price AS unit_price, cl.quantity
    FROM grocer.cart_line cl
    JOIN grocer.product p ON p.id = cl.product_id
    WHERE cl.user_id = $1
    ORDER BY cl.added_at, cl.id
";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add one unit of a product to the user's cart.
    ///
    /// Inserts a line with quantity 1, or increments the existing line for the
    /// same product. The unique `(user_id, product_id)` constraint makes this
    /// a single atomic statement under concurrent adds. The increment stops at
    /// [`MAX_LINE_QUANTITY`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartLine, RepositoryError> {
        let row = sqlx::query_as::<_, CartLineRow>(
            r"
            INSERT INTO grocer.cart_line (user_id, product_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = LEAST(grocer.cart_line.quantity + 1, $3)
            RETURNING id, user_id, product_id, quantity, added_at
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(MAX_LINE_QUANTITY)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::classify(e, "duplicate cart line", "product not found"))?;

        Ok(CartLine::from(row))
    }

    /// The user's cart lines joined with product name, image and current price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartLineView>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineViewRow>(LINE_VIEW_SQL)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(CartLineView::from).collect())
    }

    /// Set the quantity of a line owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist or is
    /// not the user's.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        line_id: CartLineId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE grocer.cart_line
            SET quantity = $3
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(line_id)
        .bind(user_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a line owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist or is
    /// not the user's.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove(&self, user_id: UserId, line_id: CartLineId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM grocer.cart_line WHERE id = $1 AND user_id = $2")
            .bind(line_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Number of lines in the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM grocer.cart_line WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }

    /// Read and row-lock the user's cart lines inside a checkout transaction.
    ///
    /// Concurrent adds, updates and removals on these lines block until the
    /// transaction ends.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the query fails.
    pub async fn lock_lines(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
    ) -> Result<Vec<CartLineView>, sqlx::Error> {
        let sql = format!("{LINE_VIEW_SQL} FOR UPDATE OF cl");
        let rows = sqlx::query_as::<_, CartLineViewRow>(&sql)
            .bind(user_id)
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(CartLineView::from).collect())
    }

    /// Delete exactly the given lines inside a checkout transaction.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the query fails.
    pub async fn delete_lines(
        tx: &mut Transaction<'_, Postgres>,
        ids: &[CartLineId],
    ) -> Result<u64, sqlx::Error> {
        let ids: Vec<i32> = ids.iter().copied().map(CartLineId::as_i32).collect();
        let rows_affected = sqlx::query("DELETE FROM grocer.cart_line WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
