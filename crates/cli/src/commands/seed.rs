//! Seed the product catalog and, optionally, the demo shopper.

use thiserror::Error;
use tracing::info;

use grocer_storefront::db::{self, RepositoryError};
use grocer_storefront::seed::{
    DEMO_USER_EMAIL, DEMO_USER_NAME, DEMO_USER_PASSWORD, seed_catalog_if_empty,
};
use grocer_storefront::services::{AuthError, AuthService};

use super::{ConnectError, connect};

/// Errors from `grocer-cli seed`.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Catalog seeding failed: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Demo user creation failed: {0}")]
    DemoUser(#[from] AuthError),
}

/// Seed the default catalog.
///
/// # Arguments
///
/// * `reset` - Delete every user, product, cart and order first
/// * `demo_user` - Create the demo account unless it already exists
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn run(reset: bool, demo_user: bool) -> Result<(), SeedError> {
    let pool = connect().await?;

    if reset {
        info!("Deleting users, products, carts and orders...");
        db::reset_store(&pool).await?;
    }

    let inserted = seed_catalog_if_empty(&pool).await?;
    if inserted == 0 {
        info!("Catalog already populated, nothing inserted");
    } else {
        info!("Inserted {inserted} products");
    }

    if demo_user {
        let auth = AuthService::new(&pool);
        match auth
            .register(
                DEMO_USER_NAME,
                DEMO_USER_EMAIL,
                DEMO_USER_PASSWORD,
                DEMO_USER_PASSWORD,
            )
            .await
        {
            Ok(user) => info!("Created demo user {} (id {})", user.email, user.id),
            Err(AuthError::UserAlreadyExists) => info!("Demo user already exists"),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
