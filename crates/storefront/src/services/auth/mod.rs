//! Authentication service.
//!
//! Provides password registration and login. Hashes are Argon2id PHC strings.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::info;

use grocer_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Authentication service.
///
/// Handles user registration and password login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// Does not log the user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if name, email or password is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, AuthError> {
        let email = validate_registration(name, email, password, confirm_password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name.trim(), &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or
    /// malformed, or the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_credentials_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate registration fields in order, returning the parsed email.
fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<Email, AuthError> {
    if name.trim().is_empty() {
        return Err(AuthError::MissingField("Name"));
    }
    if email.trim().is_empty() {
        return Err(AuthError::MissingField("Email"));
    }
    if password.is_empty() {
        return Err(AuthError::MissingField("Password"));
    }

    let email = Email::parse(email)?;

    if password != confirm_password {
        return Err(AuthError::PasswordMismatch);
    }

    Ok(email)
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_registration_ok() {
        let email =
            validate_registration("Jane", " jane@example.com ", "secret", "secret").unwrap();
        assert_eq!(email.as_str(), "jane@example.com");
    }

    #[test]
    fn test_validate_registration_password_mismatch() {
        let err = validate_registration("Jane", "jane@example.com", "secret", "secreT").unwrap_err();
        assert!(matches!(err, AuthError::PasswordMismatch));
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_validate_registration_missing_fields() {
        assert!(matches!(
            validate_registration(" ", "jane@example.com", "a", "a"),
            Err(AuthError::MissingField("Name"))
        ));
        assert!(matches!(
            validate_registration("Jane", "", "a", "a"),
            Err(AuthError::MissingField("Email"))
        ));
        assert!(matches!(
            validate_registration("Jane", "jane@example.com", "", ""),
            Err(AuthError::MissingField("Password"))
        ));
    }

    #[test]
    fn test_validate_registration_checks_email_before_passwords() {
        let err = validate_registration("Jane", "not-an-email", "a", "b").unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }

    #[test]
    fn test_short_passwords_are_accepted() {
        assert!(validate_registration("Jane", "jane@example.com", "x", "x").is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("password123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("password123", &hash).is_ok());
        assert!(matches!(
            verify_password("password124", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_user_errors() {
        assert!(AuthError::InvalidCredentials.is_user_error());
        assert!(AuthError::UserAlreadyExists.is_user_error());
        assert!(!AuthError::PasswordHash.is_user_error());
    }
}
