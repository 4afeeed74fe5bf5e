//! Root route handler.

use axum::response::Redirect;

use crate::middleware::OptionalAuth;

/// Send logged-in users to the catalog and everyone else to the login page.
pub async fn home(OptionalAuth(user): OptionalAuth) -> Redirect {
    if user.is_some() {
        Redirect::to("/products")
    } else {
        Redirect::to("/login")
    }
}
