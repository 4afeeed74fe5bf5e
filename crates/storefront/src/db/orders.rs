//! Order repository.
//!
//! Writes happen only inside the checkout transaction; reads are scoped to
//! the owning user.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use grocer_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartLineView, Order, OrderItem, OrderItemView, OrderSummary, PlacedOrder};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    total_amount: Decimal,
    status: String,
    order_date: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderSummaryRow {
    id: i32,
    user_id: i32,
    total_amount: Decimal,
    status: String,
    order_date: DateTime<Utc>,
    item_count: i64,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    price: Decimal,
}

#[derive(sqlx::FromRow)]
struct OrderItemViewRow {
    product_id: i32,
    name: String,
    image: Option<String>,
    quantity: i32,
    price: Decimal,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = r
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;

        Ok(Self {
            id: OrderId::new(r.id),
            user_id: UserId::new(r.user_id),
            total_amount: r.total_amount,
            status,
            order_date: r.order_date,
        })
    }
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
    type Error = RepositoryError;

    fn try_from(r: OrderSummaryRow) -> Result<Self, Self::Error> {
        let order = Order::try_from(OrderRow {
            id: r.id,
            user_id: r.user_id,
            total_amount: r.total_amount,
            status: r.status,
            order_date: r.order_date,
        })?;

        Ok(Self {
            order,
            item_count: r.item_count,
        })
    }
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(r.id),
            order_id: OrderId::new(r.order_id),
            product_id: ProductId::new(r.product_id),
            quantity: r.quantity,
            price: r.price,
        }
    }
}

impl From<OrderItemViewRow> for OrderItemView {
    fn from(r: OrderItemViewRow) -> Self {
        Self {
            product_id: ProductId::new(r.product_id),
            name: r.name,
            image: r.image,
            quantity: r.quantity,
            price: r.price,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a completed order inside the checkout transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_order(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        total_amount: Decimal,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO grocer.customer_order (user_id, total_amount, status)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, total_amount, status, order_date
            ",
        )
        .bind(user_id)
        .bind(total_amount)
        .bind(OrderStatus::Completed.as_str())
        .fetch_one(&mut **tx)
        .await?;

        Order::try_from(row)
    }

    /// Insert one order item per cart line, snapshotting each line's current
    /// unit price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        order_id: OrderId,
        lines: &[CartLineView],
    ) -> Result<(), RepositoryError> {
        for line in lines {
            sqlx::query(
                r"
                INSERT INTO grocer.order_item (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// The user's orders, newest first, with the number of items in each.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is unknown.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r"
            SELECT o.id, o.user_id, o.total_amount, o.status, o.order_date,
                   COUNT(oi.id) AS item_count
            FROM grocer.customer_order o
            LEFT JOIN grocer.order_item oi ON oi.order_id = o.id
            WHERE o.user_id = $1
            GROUP BY o.id
            ORDER BY o.order_date DESC, o.id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderSummary::try_from).collect()
    }

    /// One of the user's orders with its items joined to product names.
    ///
    /// Returns `None` when the order does not exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored status is unknown.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<PlacedOrder>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, total_amount, status, order_date
            FROM grocer.customer_order
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = Order::try_from(row)?;

        let items = sqlx::query_as::<_, OrderItemViewRow>(
            r"
            SELECT oi.product_id, p.name, p.image, oi.quantity, oi.price
            FROM grocer.order_item oi
            JOIN grocer.product p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            ",
        )
        .bind(order.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(PlacedOrder {
            order,
            items: items.into_iter().map(OrderItemView::from).collect(),
        }))
    }

    /// Raw items of an order, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, product_id, quantity, price
            FROM grocer.order_item
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }
}
