//! Cart route handlers.
//!
//! The cart page is server-rendered; add, update and remove are JSON
//! endpoints driven by `static/js/cart.js`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::request::Parts,
};
use serde_json::{Value, json};
use tracing::instrument;

use grocer_core::{CartLineId, CurrencyCode, ProductId};

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CartLineView, CartSummary};
use crate::routes::{PageHeader, format_money};
use crate::services::{CartService, Quantity};
use crate::state::AppState;

/// A numeric id from the request path.
///
/// Rejects like every other cart endpoint error: a 400 JSON body
/// `{"success": false, "message": "Invalid id"}` instead of axum's
/// plain-text `Path` rejection.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("Invalid id".to_string()))?;
        Ok(Self(id))
    }
}

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub product_id: i32,
    pub name: String,
    pub category: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
}

impl CartView {
    /// Format a cart summary for display.
    #[must_use]
    pub fn new(summary: &CartSummary, currency: CurrencyCode) -> Self {
        Self {
            items: summary
                .lines
                .iter()
                .map(|line| CartItemView::new(line, currency))
                .collect(),
            total: format_money(currency, summary.total),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn new(line: &CartLineView, currency: CurrencyCode) -> Self {
        Self {
            id: line.id.as_i32(),
            product_id: line.product_id.as_i32(),
            name: line.name.clone(),
            category: line.category.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            price: format_money(currency, line.unit_price),
            line_price: format_money(currency, line.line_total()),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub header: PageHeader,
    pub cart: CartView,
}

/// Display the cart page.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<CartShowTemplate, AppError> {
    let summary = CartService::new(state.pool()).view_cart(user.id).await?;

    Ok(CartShowTemplate {
        header: PageHeader {
            user_name: Some(user.name),
            cart_count: i64::try_from(summary.line_count()).unwrap_or(i64::MAX),
        },
        cart: CartView::new(&summary, state.config().currency),
    })
}

/// Add one unit of a product to the cart.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(product_id): IdPath,
) -> Result<Json<Value>, AppError> {
    let added = CartService::new(state.pool())
        .add_item(user.id, ProductId::new(product_id))
        .await?;

    let product = product_id.to_string();
    add_breadcrumb("cart", "Added product", Some(&[("product_id", product.as_str())]));

    Ok(Json(json!({
        "success": true,
        "quantity": added.quantity,
        "cart_count": added.cart_count,
    })))
}

/// Set the quantity of a cart line from a `{"quantity": n}` body.
///
/// The body is validated before the line is looked up, so an invalid
/// quantity is a 400 even for a line the user does not own.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_quantity(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(line_id): IdPath,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let quantity = Quantity::from_json_body(&body)?;
    let currency = state.config().currency;

    let updated = CartService::new(state.pool())
        .update_quantity(user.id, CartLineId::new(line_id), quantity)
        .await?;

    Ok(Json(json!({
        "success": true,
        "quantity": quantity.get(),
        "line_total": format_money(currency, updated.line_total),
        "cart_total": format_money(currency, updated.cart_total),
    })))
}

/// Remove a line from the cart.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(line_id): IdPath,
) -> Result<Json<Value>, AppError> {
    let summary = CartService::new(state.pool())
        .remove_item(user.id, CartLineId::new(line_id))
        .await?;

    Ok(Json(json!({
        "success": true,
        "cart_total": format_money(state.config().currency, summary.total),
        "cart_count": summary.line_count(),
    })))
}

/// Number of lines in the cart, for the header badge.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn count(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let count = CartService::new(state.pool()).count(user.id).await?;
    Ok(Json(json!({ "count": count })))
}
