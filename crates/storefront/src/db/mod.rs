//! Database operations for the storefront `PostgreSQL` store.
//!
//! # Schema: `grocer`
//!
//! ## Tables
//!
//! - `app_user` - Registered shoppers (email unique, argon2 password hash)
//! - `product` - The catalog, seeded once when empty
//! - `cart_line` - One row per (user, product) with a quantity
//! - `customer_order` - Orders placed at checkout
//! - `order_item` - Price-snapshotted lines of an order
//! - `tower_sessions.session` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p grocer-cli -- migrate
//! ```

pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower_sessions_sqlx_store::PostgresStore;

/// Embedded storefront migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A referenced row (e.g., the product of a cart line) does not exist.
    #[error("missing reference: {0}")]
    ForeignKey(String),
}

impl RepositoryError {
    /// Classify a sqlx error, mapping unique and foreign-key violations.
    pub(crate) fn classify(e: sqlx::Error, conflict: &str, missing: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict.to_owned());
            }
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKey(missing.to_owned());
            }
        }
        Self::Database(e)
    }
}

/// Error running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("schema migration failed: {0}")]
    Schema(#[from] sqlx::migrate::MigrateError),

    #[error("session store migration failed: {0}")]
    SessionStore(#[from] sqlx::Error),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the storefront schema migrations and create the session table.
///
/// # Errors
///
/// Returns `MigrationError` if either migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrationError> {
    MIGRATOR.run(pool).await?;
    PostgresStore::new(pool.clone()).migrate().await?;
    Ok(())
}

/// Delete every user, product, cart, order and session.
///
/// Used by `grocer-cli seed --reset`. Carts and orders go with their users
/// through `ON DELETE CASCADE`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a statement fails; nothing is
/// committed in that case.
pub async fn reset_store(pool: &PgPool) -> Result<(), RepositoryError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM grocer.app_user")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM grocer.product")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM tower_sessions.session")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
