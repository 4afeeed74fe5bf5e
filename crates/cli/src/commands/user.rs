//! Shopper account management.

use thiserror::Error;

use grocer_storefront::services::{AuthError, AuthService};

use super::{ConnectError, connect};

/// Errors from `grocer-cli user`.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create a shopper account with the same validation as the register form.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `UserError::Auth` if validation fails or the email is taken.
pub async fn create(name: &str, email: &str, password: &str) -> Result<i32, UserError> {
    let pool = connect().await?;

    tracing::info!("Creating user: {}", email);
    let user = AuthService::new(&pool)
        .register(name, email, password, password)
        .await?;

    tracing::info!("User created with id {}", user.id);
    Ok(user.id.as_i32())
}
