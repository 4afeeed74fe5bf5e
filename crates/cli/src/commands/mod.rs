//! Subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by every command before it reaches its own logic.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Neither `GROCER_DATABASE_URL` nor `DATABASE_URL` is set.
    #[error("Missing environment variable: GROCER_DATABASE_URL")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Load `.env`, read the database URL and open a pool.
pub async fn connect() -> Result<PgPool, ConnectError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("GROCER_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConnectError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = grocer_storefront::db::create_pool(&database_url).await?;
    Ok(pool)
}
