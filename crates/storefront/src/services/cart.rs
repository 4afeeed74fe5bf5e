//! Cart service.
//!
//! Owns quantity validation and the JSON payloads returned to the cart
//! page script.

use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;

use grocer_core::{CartLineId, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::models::{CartSummary, MAX_LINE_QUANTITY};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity missing, not an integer, or outside `1..=Quantity::MAX`.
    #[error("Invalid quantity")]
    InvalidQuantity,

    #[error("Product not found")]
    ProductNotFound,

    /// Line absent or owned by another user.
    #[error("Item not found")]
    ItemNotFound,

    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CartError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::ForeignKey(_) => Self::ProductNotFound,
            RepositoryError::NotFound => Self::ItemNotFound,
            other => Self::Repository(other),
        }
    }
}

/// A validated cart line quantity, between 1 and [`Quantity::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(i32);

impl Quantity {
    /// Keeps `quantity * price` far below the `NUMERIC(18, 2)` order total.
    pub const MAX: i32 = MAX_LINE_QUANTITY;

    /// Validate a raw quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `n` is below 1 or above [`Quantity::MAX`].
    pub fn new(n: i64) -> Result<Self, CartError> {
        i32::try_from(n)
            .ok()
            .filter(|q| (1..=Self::MAX).contains(q))
            .map(Self)
            .ok_or(CartError::InvalidQuantity)
    }

    /// Parse a `{"quantity": <int>}` request body.
    ///
    /// Malformed JSON, a missing field, strings, floats and booleans are all
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for anything but a positive integer.
    pub fn from_json_body(body: &[u8]) -> Result<Self, CartError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| CartError::InvalidQuantity)?;
        let n = value
            .get("quantity")
            .and_then(Value::as_i64)
            .ok_or(CartError::InvalidQuantity)?;
        Self::new(n)
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Result of adding a product to the cart.
#[derive(Debug, Clone, Copy)]
pub struct AddedItem {
    /// Quantity of the product's line after the add.
    pub quantity: i32,
    /// Number of lines in the cart.
    pub cart_count: i64,
}

/// Result of changing a line's quantity.
#[derive(Debug, Clone, Copy)]
pub struct QuantityUpdated {
    pub line_total: Decimal,
    pub cart_total: Decimal,
}

/// Per-user cart operations.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
        }
    }

    /// Add one unit of a product, creating or incrementing its line.
    ///
    /// Stock is not checked. A line already at [`Quantity::MAX`] stays there.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product does not exist.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<AddedItem, CartError> {
        let line = self.carts.add(user_id, product_id).await?;
        let cart_count = self.carts.count(user_id).await?;

        Ok(AddedItem {
            quantity: line.quantity,
            cart_count,
        })
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the line is absent or not owned.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        line_id: CartLineId,
        quantity: Quantity,
    ) -> Result<QuantityUpdated, CartError> {
        self.carts
            .update_quantity(user_id, line_id, quantity.get())
            .await?;

        let cart = self.view_cart(user_id).await?;
        let line_total = cart
            .lines
            .iter()
            .find(|l| l.id == line_id)
            .map_or(Decimal::ZERO, |l| l.line_total());

        Ok(QuantityUpdated {
            line_total,
            cart_total: cart.total,
        })
    }

    /// Delete a line and return the remaining cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the line is absent or not owned.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        line_id: CartLineId,
    ) -> Result<CartSummary, CartError> {
        self.carts.remove(user_id, line_id).await?;
        self.view_cart(user_id).await
    }

    /// The user's lines with current prices and the computed total.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn view_cart(&self, user_id: UserId) -> Result<CartSummary, CartError> {
        let lines = self.carts.lines_for_user(user_id).await?;
        Ok(CartSummary::from_lines(lines))
    }

    /// Number of lines in the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn count(&self, user_id: UserId) -> Result<i64, CartError> {
        Ok(self.carts.count(user_id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(Quantity::new(1).unwrap().get(), 1);
        assert_eq!(Quantity::new(999).unwrap().get(), Quantity::MAX);
        assert!(Quantity::new(0).is_err());
        assert!(Quantity::new(-3).is_err());
        assert!(Quantity::new(1000).is_err());
        assert!(Quantity::new(i64::from(i32::MAX)).is_err());
        assert!(Quantity::new(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn test_quantity_from_json_body() {
        assert_eq!(
            Quantity::from_json_body(br#"{"quantity": 3}"#).unwrap().get(),
            3
        );
    }

    #[test]
    fn test_quantity_rejects_non_integers() {
        let bodies: [&[u8]; 11] = [
            br#"{"quantity": 0}"#,
            br#"{"quantity": 1000}"#,
            br#"{"quantity": 2147483647}"#,
            br#"{"quantity": -1}"#,
            br#"{"quantity": "2"}"#,
            br#"{"quantity": 2.5}"#,
            br#"{"quantity": true}"#,
            br#"{"quantity": null}"#,
            br"{}",
            br"not json",
            b"",
        ];
        for body in bodies {
            assert!(
                matches!(
                    Quantity::from_json_body(body),
                    Err(CartError::InvalidQuantity)
                ),
                "accepted {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_repository_errors_map_to_cart_errors() {
        assert!(matches!(
            CartError::from(RepositoryError::ForeignKey("product".into())),
            CartError::ProductNotFound
        ));
        assert!(matches!(
            CartError::from(RepositoryError::NotFound),
            CartError::ItemNotFound
        ));
        assert!(matches!(
            CartError::from(RepositoryError::DataCorruption("x".into())),
            CartError::Repository(_)
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CartError::InvalidQuantity.to_string(), "Invalid quantity");
        assert_eq!(CartError::ItemNotFound.to_string(), "Item not found");
    }
}
