//! Checkout service.
//!
//! Converts a user's cart into an order in one database transaction.

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use grocer_core::{CartLineId, UserId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::orders::OrderRepository;
use crate::models::{CartLineView, CartSummary, OrderItemView, PlacedOrder};

/// Errors from checkout.
///
/// Any error leaves the cart untouched and no order rows behind.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

impl From<&CartLineView> for OrderItemView {
    fn from(line: &CartLineView) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            price: line.unit_price,
        }
    }
}

/// Cart review and order placement.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The cart as it would be ordered right now.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the query fails.
    pub async fn review(&self, user_id: UserId) -> Result<CartSummary, CheckoutError> {
        let lines = CartRepository::new(self.pool)
            .lines_for_user(user_id)
            .await?;
        Ok(CartSummary::from_lines(lines))
    }

    /// Place an order for everything in the user's cart.
    ///
    /// Locks the cart lines, writes the order and one item per line at the
    /// product's current price, then deletes exactly the locked lines. Returns
    /// `None` without writing anything when the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if any statement fails; the
    /// transaction is rolled back on drop.
    pub async fn place_order(&self, user_id: UserId) -> Result<Option<PlacedOrder>, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        let lines = CartRepository::lock_lines(&mut tx, user_id).await?;
        if lines.is_empty() {
            tx.rollback().await?;
            return Ok(None);
        }

        let cart = CartSummary::from_lines(lines);
        let order = OrderRepository::insert_order(&mut tx, user_id, cart.total).await?;
        OrderRepository::insert_items(&mut tx, order.id, &cart.lines).await?;

        let line_ids: Vec<CartLineId> = cart.lines.iter().map(|l| l.id).collect();
        CartRepository::delete_lines(&mut tx, &line_ids).await?;

        tx.commit().await?;

        info!(
            user_id = %user_id,
            order_id = %order.id,
            total = %order.total_amount,
            items = cart.lines.len(),
            "order placed"
        );

        Ok(Some(PlacedOrder {
            order,
            items: cart.lines.iter().map(OrderItemView::from).collect(),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use grocer_core::ProductId;

    use super::*;

    #[test]
    fn test_order_item_snapshots_unit_price() {
        let line = CartLineView {
            id: CartLineId::new(9),
            product_id: ProductId::new(2),
            name: "Red Onions".to_string(),
            category: "Vegetables".to_string(),
            image: None,
            unit_price: Decimal::from_str("60.00").unwrap(),
            quantity: 3,
        };

        let item = OrderItemView::from(&line);
        assert_eq!(item.product_id, ProductId::new(2));
        assert_eq!(item.quantity, 3);
        assert_eq!(item.price, Decimal::from_str("60.00").unwrap());
        assert_eq!(item.line_total(), Decimal::from_str("180.00").unwrap());
    }
}
