//! Integration tests for registration and login.
//!
//! Require `DATABASE_URL` pointing at a `PostgreSQL` server; run with
//! `cargo test -p grocer-integration-tests -- --ignored`.

use sqlx::PgPool;

use grocer_integration_tests::{TEST_PASSWORD, count_rows, register_user};
use grocer_storefront::services::{AuthError, AuthService};

// =============================================================================
// Registration
// =============================================================================

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_register_with_mismatched_passwords_creates_nothing(pool: PgPool) {
    let result = AuthService::new(&pool)
        .register("Jane Doe", "jane@example.com", "secret-one", "secret-two")
        .await;

    assert!(matches!(result, Err(AuthError::PasswordMismatch)));
    assert_eq!(count_rows(&pool, "app_user").await, 0);
}

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_register_twice_with_same_email_conflicts(pool: PgPool) {
    register_user(&pool, "Jane Doe", "jane@example.com").await;

    let second = AuthService::new(&pool)
        .register("Jane Again", "jane@example.com", "other", "other")
        .await;

    assert!(matches!(second, Err(AuthError::UserAlreadyExists)));
    assert_eq!(count_rows(&pool, "app_user").await, 1);
}

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_register_does_not_store_plaintext_password(pool: PgPool) {
    register_user(&pool, "Jane Doe", "jane@example.com").await;

    let stored: String = sqlx::query_scalar("SELECT password FROM grocer.app_user")
        .fetch_one(&pool)
        .await
        .expect("Failed to read password column");

    assert_ne!(stored, TEST_PASSWORD);
    assert!(stored.starts_with("$argon2"));
}

// =============================================================================
// Login
// =============================================================================

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_login_with_correct_password(pool: PgPool) {
    let registered = register_user(&pool, "Jane Doe", "jane@example.com").await;

    let user = AuthService::new(&pool)
        .login("jane@example.com", TEST_PASSWORD)
        .await
        .expect("Login should succeed");

    assert_eq!(user.id, registered.id);
    assert_eq!(user.name, "Jane Doe");
}

#[sqlx::test(migrator = "grocer_storefront::db::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_login_failures_are_indistinguishable(pool: PgPool) {
    register_user(&pool, "Jane Doe", "jane@example.com").await;
    let auth = AuthService::new(&pool);

    let wrong_password = auth.login("jane@example.com", "not-it").await;
    let unknown_email = auth.login("nobody@example.com", TEST_PASSWORD).await;

    assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
    assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
}
