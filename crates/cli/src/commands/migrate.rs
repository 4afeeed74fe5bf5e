//! Database migration command.
//!
//! Applies the embedded migrations from `crates/storefront/migrations/` and
//! creates the `tower_sessions` table used by the session store.

use thiserror::Error;

use grocer_storefront::db::{self, MigrationError};

use super::{ConnectError, connect};

/// Errors from `grocer-cli migrate`.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// Run all storefront migrations.
///
/// # Errors
///
/// Returns `MigrateError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrateError> {
    let pool = connect().await?;

    tracing::info!("Running storefront migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
