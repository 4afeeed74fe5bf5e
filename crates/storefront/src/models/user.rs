//! User domain types.

use chrono::{DateTime, Utc};

use grocer_core::{Email, UserId};

use super::CurrentUser;

/// A registered shopper.
///
/// The password hash is deliberately absent; it is only read by the
/// repository method that backs login.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name given at registration.
    pub name: String,
    /// User's email address (unique).
    pub email: Email,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
