//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use grocer_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// An order placed at checkout. Immutable once created.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Sum of `price × quantity` over the order's items.
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

/// A line of an order, with the unit price captured at checkout.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// An order item joined with the product name for display.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub quantity: i32,
    /// Unit price paid, not the product's current price.
    pub price: Decimal,
}

impl OrderItemView {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// An order as listed on the order history page.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub order: Order,
    /// Number of items (lines) in the order.
    pub item_count: i64,
}

/// An order with its items, for the detail and confirmation pages.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItemView>,
}
