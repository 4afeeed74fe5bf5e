//! Authentication route handlers.
//!
//! Login, registration and logout. Failed form submissions re-render the
//! form with an inline error and the status code of the failure.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::PageHeader;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Set after a successful registration.
    pub registered: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub header: PageHeader,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub header: PageHeader,
    pub error: Option<String>,
    pub name: String,
    pub email: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/products").into_response();
    }

    LoginTemplate {
        header: PageHeader::guest(),
        error: None,
        notice: query
            .registered
            .map(|_| "Registration successful! Please log in.".to_string()),
        email: String::new(),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("login failed");
            let page = LoginTemplate {
                header: PageHeader::guest(),
                error: Some("Invalid credentials".to_string()),
                notice: None,
                email: form.email,
            };
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let current_user = CurrentUser::from(&user);
    set_current_user(&session, &current_user)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Redirect::to("/products").into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(OptionalAuth(user): OptionalAuth) -> Response {
    if user.is_some() {
        return Redirect::to("/products").into_response();
    }

    RegisterTemplate {
        header: PageHeader::guest(),
        error: None,
        name: String::new(),
        email: String::new(),
    }
    .into_response()
}

/// Handle registration form submission.
///
/// Does not log the new user in; redirects to the login page instead.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let result = AuthService::new(state.pool())
        .register(
            &form.name,
            &form.email,
            &form.password,
            &form.confirm_password,
        )
        .await;

    match result {
        Ok(_) => Ok(Redirect::to("/login?registered=1").into_response()),
        Err(e) if e.is_user_error() => {
            let message = e.to_string();
            let status = AppError::from(e).status();
            let page = RegisterTemplate {
                header: PageHeader::guest(),
                error: Some(message),
                name: form.name,
                email: form.email,
            };
            Ok((status, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Logout
// =============================================================================

/// End the session and return to the login page.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!("failed to clear session on logout: {e}");
    }
    clear_sentry_user();

    Redirect::to("/login")
}
