//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Redirect to /products or /login
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! # Auth
//! GET  /login                       - Login page
//! POST /login                       - Login action
//! GET  /register                    - Register page
//! POST /register                    - Register action
//! GET  /logout                      - Logout action
//!
//! # Catalog (requires auth)
//! GET  /products?category=...       - Product grid with cart badge
//!
//! # Cart (requires auth)
//! GET  /cart                        - Cart page
//! POST /add-to-cart/{product_id}    - Add one unit (JSON)
//! POST /update_quantity/{line_id}   - Set quantity, body {"quantity": n} (JSON)
//! POST /remove_from_cart/{line_id}  - Remove line (JSON)
//! GET  /cart_count                  - Number of cart lines (JSON)
//!
//! # Checkout and orders (requires auth)
//! GET  /checkout                    - Review cart
//! POST /checkout                    - Place order, show confirmation
//! GET  /orders                      - Order history
//! GET  /orders/{order_id}           - Order detail
//! ```
//!
//! JSON routes answer unauthenticated requests with 401; page routes
//! redirect to `/login`.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::SessionStore;

use grocer_core::{CurrencyCode, Price};

use crate::error::AppError;
use crate::middleware::{create_session_layer, request_id_middleware, security_headers_middleware};
use crate::models::CurrentUser;
use crate::services::CartService;
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Header data shared by every page.
#[derive(Debug, Clone, Default)]
pub struct PageHeader {
    /// Display name of the logged-in user.
    pub user_name: Option<String>,
    /// Number of lines in the user's cart.
    pub cart_count: i64,
}

impl PageHeader {
    /// Header for pages shown to anonymous visitors.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    /// Header for a logged-in user, including their cart badge.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the cart count query fails.
    pub async fn for_user(pool: &PgPool, user: &CurrentUser) -> Result<Self, AppError> {
        let cart_count = CartService::new(pool).count(user.id).await?;
        Ok(Self {
            user_name: Some(user.name.clone()),
            cart_count,
        })
    }
}

/// Format an amount in the configured currency, e.g. `₹150.00`.
#[must_use]
pub fn format_money(currency: CurrencyCode, amount: Decimal) -> String {
    Price::new(amount, currency).display()
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/add-to-cart/{product_id}", post(cart::add))
        .route("/update_quantity/{line_id}", post(cart::update_quantity))
        .route("/remove_from_cart/{line_id}", post(cart::remove))
        .route("/cart_count", get(cart::count))
}

/// Create the checkout and order history routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::review).post(checkout::place))
        .route("/orders", get(orders::index))
        .route("/orders/{order_id}", get(orders::show))
}

/// Create all page and API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products", get(products::index))
        .merge(auth_routes())
        .merge(cart_routes())
        .merge(order_routes())
}

/// Build the complete application: routes, health checks, static files and
/// the middleware stack.
///
/// The caller supplies the session store and adds the Sentry layers.
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    with_middleware(base_router(), state, session_store)
}

/// All routes without middleware.
fn base_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
}

/// Wrap a router in the storefront middleware stack and attach the state.
fn with_middleware<S>(router: Router<AppState>, state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, state.config());

    router
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(session_layer)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
