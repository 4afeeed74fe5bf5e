//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use grocer_core::{CartLineId, ProductId, UserId};

/// Largest quantity a cart line may hold. Mirrors the `cart_line` check
/// constraint.
pub const MAX_LINE_QUANTITY: i32 = 999;

/// A raw cart line: one product in one user's cart.
///
/// At most one line exists per (user, product); adding the same product
/// again increments `quantity`.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: CartLineId,
    pub user_id: UserId,
    pub product_id: ProductId,
    /// Between 1 and [`MAX_LINE_QUANTITY`].
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

/// A cart line joined with its product, as shown on the cart page.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub image: Option<String>,
    /// The product's current unit price.
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl CartLineView {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A user's cart with its computed total.
#[derive(Debug, Clone, Default)]
pub struct CartSummary {
    pub lines: Vec<CartLineView>,
    pub total: Decimal,
}

impl CartSummary {
    /// Build a summary, computing the total from current prices.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLineView>) -> Self {
        let total = lines.iter().map(CartLineView::line_total).sum();
        Self { lines, total }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines, which is what the header badge shows.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn line(id: i32, price: &str, quantity: i32) -> CartLineView {
        CartLineView {
            id: CartLineId::new(id),
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            category: "Vegetables".to_string(),
            image: None,
            unit_price: Decimal::from_str(price).unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(
            line(1, "45.00", 2).line_total(),
            Decimal::from_str("90.00").unwrap()
        );
    }

    #[test]
    fn test_summary_total_sums_lines() {
        let summary = CartSummary::from_lines(vec![line(1, "45.00", 2), line(2, "60.00", 1)]);
        assert_eq!(summary.total, Decimal::from_str("150.00").unwrap());
        assert_eq!(summary.line_count(), 2);
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_empty_summary() {
        let summary = CartSummary::from_lines(Vec::new());
        assert!(summary.is_empty());
        assert_eq!(summary.total, Decimal::ZERO);
    }
}
