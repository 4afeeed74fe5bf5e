//! Domain models for the storefront.
//!
//! Database row types stay private to `crate::db`; these are the validated
//! shapes handed to services, handlers and templates.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{CartLine, CartLineView, CartSummary, MAX_LINE_QUANTITY};
pub use order::{Order, OrderItem, OrderItemView, OrderSummary, PlacedOrder};
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
