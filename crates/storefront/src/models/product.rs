//! Catalog product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use grocer_core::ProductId;

/// A product in the catalog.
///
/// `stock` is informational only: it is neither checked when adding to the
/// cart nor decremented at checkout.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Current unit price (never negative).
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    /// Absolute URL or `/static` path of the product photo.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A product to insert when seeding the catalog.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: &'static str,
    pub description: &'static str,
    pub price: Decimal,
    pub category: &'static str,
    pub stock: i32,
    pub image: &'static str,
}
