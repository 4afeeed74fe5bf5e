//! Default product catalog.
//!
//! Inserted once, when `grocer.product` is empty, either at server start
//! (`GROCER_SEED_CATALOG`) or by `grocer-cli seed`.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::models::product::NewProduct;

/// Name of the demo account created by `grocer-cli seed --demo-user`.
pub const DEMO_USER_NAME: &str = "John Doe";
/// Email of the demo account.
pub const DEMO_USER_EMAIL: &str = "john@example.com";
/// Password of the demo account.
pub const DEMO_USER_PASSWORD: &str = "password123";

/// The ten products every fresh store starts with.
#[must_use]
pub fn default_catalog() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Fresh Carrots",
            description: "Organic fresh carrots, rich in Vitamin A",
            price: Decimal::new(4500, 2),
            category: "Vegetables",
            stock: 50,
            image: "https://images.unsplash.com/photo-1598170845058-78131a90f4bf?w=400&h=300&fit=crop",
        },
        NewProduct {
            name: "Red Onions",
            description: "Premium red onions, great for cooking",
            price: Decimal::new(6000, 2),
            category: "Vegetables",
            stock: 40,
            image: "https://images.unsplash.com/photo-1580201092675-a0a6a6cafbb1?w=400&h=300&fit=crop",
        },
        NewProduct {
            name: "Cucumber",
            description: "Fresh green cucumbers, perfect for salads",
            price: Decimal::new(2500, 2),
            category: "Vegetables",
            stock: 60,
            image: "https://images.unsplash.com/photo-1568639658-44f2a6e61f5c?w=400&h=300&fit=crop",
        },
        NewProduct {
            name: "Tomatoes",
            description: "Farm fresh tomatoes, juicy and ripe",
            price: Decimal::new(4000, 2),
            category: "Vegetables",
            stock: 45,
            image: "https://images.unsplash.com/photo-1592924357228-91a4daadcfea?w=400&h=300&fit=crop",
        },
        NewProduct {
            name: "Broccoli",
            description: "Fresh broccoli, packed with nutrients",
            price: Decimal::new(8000, 2),
            category: "Vegetables",
            stock: 30,
            image: "https://images.unsplash.com/photo-1459411621453-7b03977f4c4e?w=400&h=300&fit=crop",
        },
        NewProduct {
            name: "Apples",
            description: "Red delicious apples, sweet and crisp",
            price: Decimal::new(12000, 2),
            category: "Fruits",
            stock: 35,
            image: "https://images.unsplash.com/photo-1568702846914-96b305d2aaeb?w=400&h=300&fit=crop",
        },
        NewProduct {
            name: "Bananas",
            description: "Ripe bananas, perfect for smoothies",
            price: Decimal::new(3500, 2),
            category: "Fruits",
            stock: 55,
            image: "https://images.unsplash.com/photo-1603833665858-e61d17a86224?w=400&h=300&fit=crop",
        },
        NewProduct {
            name: "Butter",
            description: "Amul butter 500g, creamy and fresh",
            price: Decimal::new(25000, 2),
            category: "Dairy",
            stock: 25,
            image: "https://images.unsplash.com/photo-1557838923-2985c318be48?w=400&h=300&fit=crop",
        },
        NewProduct {
            name: "Milk",
            description: "Fresh cow milk 1L, pasteurized",
            price: Decimal::new(6000, 2),
            category: "Dairy",
            stock: 40,
            image: "https://images.unsplash.com/photo-1563636619-e9143da7973b?w=400&h=300&fit=crop",
        },
        NewProduct {
            name: "Bread",
            description: "Whole wheat bread, fresh baked",
            price: Decimal::new(3500, 2),
            category: "Bakery",
            stock: 40,
            image: "https://images.unsplash.com/photo-1549931319-a545dcf3bc73?w=400&h=300&fit=crop",
        },
    ]
}

/// Insert the default catalog if the product table is empty.
///
/// Returns the number of products inserted (0 when the catalog already had
/// products).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
pub async fn seed_catalog_if_empty(pool: &PgPool) -> Result<u64, RepositoryError> {
    let products = ProductRepository::new(pool);

    if products.count().await? > 0 {
        return Ok(0);
    }

    let inserted = products.insert_many(&default_catalog()).await?;
    info!(count = inserted, "seeded product catalog");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_catalog_has_ten_unique_products() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 10);

        let names: HashSet<_> = catalog.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_default_catalog_values_are_valid() {
        for product in default_catalog() {
            assert!(product.price > Decimal::ZERO, "{}", product.name);
            assert_eq!(product.price.scale(), 2);
            assert!(product.stock >= 0);
            assert!(product.image.starts_with("https://images.unsplash.com/"));
        }
    }

    #[test]
    fn test_default_catalog_categories() {
        let categories: HashSet<_> = default_catalog().iter().map(|p| p.category).collect();
        let expected: HashSet<_> = ["Vegetables", "Fruits", "Dairy", "Bakery"].into();
        assert_eq!(categories, expected);
    }
}
