//! Integration tests for checkout and order history.
//!
//! Require `DATABASE_URL` pointing at a `PostgreSQL` server; run with
//! `cargo test -p grocer-integration-tests -- --ignored`.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::PgPool;

use grocer_core::{OrderId, OrderStatus};
use grocer_integration_tests::{count_rows, product_named, register_user, seed_catalog};
use grocer_storefront::db::orders::OrderRepository;
use grocer_storefront::db::products::ProductRepository;
use grocer_storefront::db::{self, RepositoryError};
use grocer_storefront::services::{CartService, CheckoutService, OrderError, OrderService};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal")
}

// =============================================================================
// Placing Orders
// =============================================================================

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_checkout_empty_cart_writes_nothing(pool: PgPool) {
    seed_catalog(&pool).await;
    let user = register_user(&pool, "Jane Doe", "jane@example.com").await;

    let placed = CheckoutService::new(&pool)
        .place_order(user.id)
        .await
        .expect("checkout");

    assert!(placed.is_none());
    assert_eq!(count_rows(&pool, "customer_order").await, 0);
    assert_eq!(count_rows(&pool, "order_item").await, 0);
}

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_checkout_snapshots_lines_and_clears_cart(pool: PgPool) {
    let products = seed_catalog(&pool).await;
    let carrots = product_named(&products, "Fresh Carrots").id;
    let onions = product_named(&products, "Red Onions").id;
    let user = register_user(&pool, "Jane Doe", "jane@example.com").await;
    let cart = CartService::new(&pool);

    cart.add_item(user.id, carrots).await.expect("add carrots");
    cart.add_item(user.id, carrots).await.expect("add carrots again");
    cart.add_item(user.id, onions).await.expect("add onions");

    let placed = CheckoutService::new(&pool)
        .place_order(user.id)
        .await
        .expect("checkout")
        .expect("cart was not empty");

    assert_eq!(placed.order.total_amount, dec("150.00"));
    assert_eq!(placed.order.status, OrderStatus::Completed);
    assert_eq!(placed.order.user_id, user.id);

    let items = OrderRepository::new(&pool)
        .items(placed.order.id)
        .await
        .expect("order items");
    let snapshot: Vec<_> = items
        .iter()
        .map(|i| (i.product_id, i.quantity, i.price))
        .collect();
    assert_eq!(
        snapshot,
        vec![(carrots, 2, dec("45.00")), (onions, 1, dec("60.00"))]
    );

    assert_eq!(cart.count(user.id).await.expect("count"), 0);
}

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_checkout_only_clears_own_cart(pool: PgPool) {
    let products = seed_catalog(&pool).await;
    let milk = product_named(&products, "Milk").id;
    let jane = register_user(&pool, "Jane Doe", "jane@example.com").await;
    let john = register_user(&pool, "John Doe", "john@example.com").await;
    let cart = CartService::new(&pool);

    cart.add_item(jane.id, milk).await.expect("jane adds");
    cart.add_item(john.id, milk).await.expect("john adds");

    CheckoutService::new(&pool)
        .place_order(jane.id)
        .await
        .expect("checkout")
        .expect("cart was not empty");

    assert_eq!(cart.count(jane.id).await.expect("count"), 0);
    assert_eq!(cart.count(john.id).await.expect("count"), 1);
}

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_failed_checkout_rolls_back_everything(pool: PgPool) {
    let products = seed_catalog(&pool).await;
    let carrots = product_named(&products, "Fresh Carrots").id;
    let onions = product_named(&products, "Red Onions").id;
    let user = register_user(&pool, "Jane Doe", "jane@example.com").await;
    let cart = CartService::new(&pool);

    cart.add_item(user.id, carrots).await.expect("add carrots");
    cart.add_item(user.id, carrots).await.expect("add carrots again");
    cart.add_item(user.id, onions).await.expect("add onions");

    // Fail the item insert, after the order row is already written
    sqlx::raw_sql(
        r"
        CREATE FUNCTION grocer.reject_order_item() RETURNS trigger AS $$
        BEGIN
            RAISE EXCEPTION 'order items unavailable';
        END;
        $$ LANGUAGE plpgsql;

        CREATE TRIGGER reject_order_item
            BEFORE INSERT ON grocer.order_item
            FOR EACH ROW EXECUTE FUNCTION grocer.reject_order_item();
        ",
    )
    .execute(&pool)
    .await
    .expect("install failing trigger");

    let result = CheckoutService::new(&pool).place_order(user.id).await;
    assert!(result.is_err());

    assert_eq!(count_rows(&pool, "customer_order").await, 0);
    assert_eq!(count_rows(&pool, "order_item").await, 0);

    let summary = cart.view_cart(user.id).await.expect("view cart");
    let lines: Vec<_> = summary
        .lines
        .iter()
        .map(|l| (l.product_id, l.quantity))
        .collect();
    assert_eq!(lines, vec![(carrots, 2), (onions, 1)]);
}

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_checkouts_place_one_order(pool: PgPool) {
    let products = seed_catalog(&pool).await;
    let bread = product_named(&products, "Bread").id;
    let milk = product_named(&products, "Milk").id;
    let user = register_user(&pool, "Jane Doe", "jane@example.com").await;
    let cart = CartService::new(&pool);

    cart.add_item(user.id, bread).await.expect("add bread");
    cart.add_item(user.id, milk).await.expect("add milk");

    let mut handles = Vec::new();
    for _ in 0..2 {
        let pool = pool.clone();
        let user_id = user.id;
        handles.push(tokio::spawn(async move {
            CheckoutService::new(&pool).place_order(user_id).await
        }));
    }

    let mut placed = 0;
    for handle in handles {
        let outcome = handle.await.expect("task panicked").expect("checkout failed");
        if let Some(order) = outcome {
            assert_eq!(order.items.len(), 2);
            placed += 1;
        }
    }

    assert_eq!(placed, 1);
    assert_eq!(count_rows(&pool, "customer_order").await, 1);
    assert_eq!(count_rows(&pool, "order_item").await, 2);
    assert_eq!(cart.count(user.id).await.expect("count"), 0);
}

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_price_change_does_not_rewrite_past_orders(pool: PgPool) {
    let products = seed_catalog(&pool).await;
    let broccoli = product_named(&products, "Broccoli").id;
    let user = register_user(&pool, "Jane Doe", "jane@example.com").await;

    CartService::new(&pool)
        .add_item(user.id, broccoli)
        .await
        .expect("add broccoli");
    let placed = CheckoutService::new(&pool)
        .place_order(user.id)
        .await
        .expect("checkout")
        .expect("cart was not empty");

    ProductRepository::new(&pool)
        .update_price(broccoli, dec("99.00"))
        .await
        .expect("price update");

    let order = OrderService::new(&pool)
        .get_order(user.id, placed.order.id)
        .await
        .expect("order");
    assert_eq!(order.items[0].price, dec("80.00"));
    assert_eq!(order.order.total_amount, dec("80.00"));
}

// =============================================================================
// Order History
// =============================================================================

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_order_history_newest_first_with_item_counts(pool: PgPool) {
    let products = seed_catalog(&pool).await;
    let user = register_user(&pool, "Jane Doe", "jane@example.com").await;
    let cart = CartService::new(&pool);
    let checkout = CheckoutService::new(&pool);

    cart.add_item(user.id, product_named(&products, "Apples").id)
        .await
        .expect("add apples");
    let first = checkout
        .place_order(user.id)
        .await
        .expect("checkout")
        .expect("cart was not empty");

    cart.add_item(user.id, product_named(&products, "Bread").id)
        .await
        .expect("add bread");
    cart.add_item(user.id, product_named(&products, "Butter").id)
        .await
        .expect("add butter");
    let second = checkout
        .place_order(user.id)
        .await
        .expect("checkout")
        .expect("cart was not empty");

    let orders = OrderService::new(&pool)
        .list_orders(user.id)
        .await
        .expect("list orders");

    let ids: Vec<_> = orders.iter().map(|o| o.order.id).collect();
    assert_eq!(ids, vec![second.order.id, first.order.id]);
    assert_eq!(orders[0].item_count, 2);
    assert_eq!(orders[1].item_count, 1);
}

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_orders_are_private(pool: PgPool) {
    let products = seed_catalog(&pool).await;
    let owner = register_user(&pool, "Jane Doe", "jane@example.com").await;
    let other = register_user(&pool, "Mallory", "mallory@example.com").await;

    CartService::new(&pool)
        .add_item(owner.id, product_named(&products, "Cucumber").id)
        .await
        .expect("add cucumber");
    let placed = CheckoutService::new(&pool)
        .place_order(owner.id)
        .await
        .expect("checkout")
        .expect("cart was not empty");

    let orders = OrderService::new(&pool);
    assert!(orders.list_orders(other.id).await.expect("list").is_empty());
    assert!(matches!(
        orders.get_order(other.id, placed.order.id).await,
        Err(OrderError::NotFound)
    ));
    assert!(matches!(
        orders.get_order(owner.id, OrderId::new(999_999)).await,
        Err(OrderError::NotFound)
    ));
}

// =============================================================================
// Maintenance
// =============================================================================

#[sqlx::test(migrations = false)]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_reset_store_empties_every_table(pool: PgPool) {
    db::migrate(&pool).await.expect("migrate");
    let products = seed_catalog(&pool).await;
    let user = register_user(&pool, "Jane Doe", "jane@example.com").await;
    CartService::new(&pool)
        .add_item(user.id, product_named(&products, "Tomatoes").id)
        .await
        .expect("add tomatoes");
    CheckoutService::new(&pool)
        .place_order(user.id)
        .await
        .expect("checkout");

    db::reset_store(&pool).await.expect("reset");

    for table in ["app_user", "product", "cart_line", "customer_order", "order_item"] {
        assert_eq!(count_rows(&pool, table).await, 0, "{table}");
    }
}

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_update_price_of_missing_product(pool: PgPool) {
    let result = ProductRepository::new(&pool)
        .update_price(grocer_core::ProductId::new(999_999), dec("1.00"))
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}
