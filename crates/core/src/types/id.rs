//! Row identifiers.
//!
//! Each table gets its own `i32` newtype so a cart line id cannot be passed
//! where an order id is expected.

/// Declare an `i32` row id newtype.
///
/// The type serializes as a bare number (it lives inside session data) and,
/// with the `postgres` feature, binds and decodes as `INTEGER`.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// A registered shopper.
    UserId
);
define_id!(
    /// A catalog product.
    ProductId
);
define_id!(
    /// One product line in a shopper's cart.
    CartLineId
);
define_id!(
    /// A placed order.
    OrderId
);
define_id!(
    /// A priced line within a placed order.
    OrderItemId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_bare_numbers() {
        let json = serde_json::to_string(&UserId::new(3)).unwrap();
        assert_eq!(json, "3");
        assert_eq!(serde_json::from_str::<UserId>("3").unwrap(), UserId::new(3));
    }

    #[test]
    fn test_ids_log_as_numbers() {
        assert_eq!(format!("order {}", OrderId::new(7)), "order 7");
        assert_eq!(CartLineId::new(42).as_i32(), 42);
    }
}
