//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `catalog` - Product listing and lookup
//! - `cart` - Per-user cart mutations and totals
//! - `checkout` - Atomic cart to order conversion
//! - `orders` - Order history
//!
//! Every service that touches user data takes the caller's `UserId` as an
//! explicit argument; none of them read the session.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService, Quantity};
pub use catalog::{CatalogError, CatalogService};
pub use checkout::{CheckoutError, CheckoutService};
pub use orders::{OrderError, OrderService};
