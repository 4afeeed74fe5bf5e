//! Order history service.

use sqlx::PgPool;
use thiserror::Error;

use grocer_core::{OrderId, UserId};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::models::{OrderSummary, PlacedOrder};

#[derive(Debug, Error)]
pub enum OrderError {
    /// Order absent or owned by another user.
    #[error("Order not found")]
    NotFound,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Read access to a user's past orders.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_orders(&self, user_id: UserId) -> Result<Vec<OrderSummary>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// One of the user's orders with its items.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order is absent or not owned.
    pub async fn get_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<PlacedOrder, OrderError> {
        self.orders
            .get_for_user(user_id, order_id)
            .await?
            .ok_or(OrderError::NotFound)
    }
}
