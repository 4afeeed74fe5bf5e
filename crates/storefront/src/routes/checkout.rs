//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::routes::PageHeader;
use crate::routes::cart::CartView;
use crate::routes::orders::OrderDetailView;
use crate::services::CheckoutService;
use crate::state::AppState;

/// Checkout review page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/review.html")]
pub struct CheckoutReviewTemplate {
    pub header: PageHeader,
    pub cart: CartView,
    pub notice: Option<String>,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub header: PageHeader,
    pub order: OrderDetailView,
}

async fn review_page(
    state: &AppState,
    user: CurrentUser,
    notice: Option<String>,
) -> Result<CheckoutReviewTemplate, AppError> {
    let summary = CheckoutService::new(state.pool()).review(user.id).await?;

    Ok(CheckoutReviewTemplate {
        header: PageHeader {
            user_name: Some(user.name),
            cart_count: i64::try_from(summary.line_count()).unwrap_or(i64::MAX),
        },
        cart: CartView::new(&summary, state.config().currency),
        notice,
    })
}

/// Review the cart before placing the order.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn review(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<CheckoutReviewTemplate, AppError> {
    review_page(&state, user, None).await
}

/// Place the order and show the confirmation.
///
/// An empty cart re-renders the review page and writes nothing.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn place(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let placed = CheckoutService::new(state.pool())
        .place_order(user.id)
        .await?;

    let Some(placed) = placed else {
        let page = review_page(&state, user, Some("Your cart is empty.".to_string())).await?;
        return Ok(page.into_response());
    };

    let order_id = placed.order.id.to_string();
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));

    Ok(CheckoutSuccessTemplate {
        header: PageHeader::for_user(state.pool(), &user).await?,
        order: OrderDetailView::new(&placed, state.config().currency),
    }
    .into_response())
}
