//! Order history route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use grocer_core::{CurrencyCode, OrderId};

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderItemView, OrderSummary, PlacedOrder};
use crate::routes::{PageHeader, format_money};
use crate::services::OrderService;
use crate::state::AppState;

/// Display format for order timestamps.
const ORDER_DATE_FORMAT: &str = "%d %b %Y, %H:%M UTC";

/// Order row on the history page.
#[derive(Clone)]
pub struct OrderRowView {
    pub id: i32,
    pub date: String,
    pub status: String,
    pub total: String,
    pub item_count: i64,
}

impl OrderRowView {
    fn new(summary: &OrderSummary, currency: CurrencyCode) -> Self {
        Self {
            id: summary.order.id.as_i32(),
            date: summary.order.order_date.format(ORDER_DATE_FORMAT).to_string(),
            status: summary.order.status.to_string(),
            total: format_money(currency, summary.order.total_amount),
            item_count: summary.item_count,
        }
    }
}

/// Order item display data for templates.
#[derive(Clone)]
pub struct OrderItemLine {
    pub name: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub price: String,
    pub line_price: String,
}

/// Full order display data, shared by the detail and confirmation pages.
#[derive(Clone)]
pub struct OrderDetailView {
    pub id: i32,
    pub date: String,
    pub status: String,
    pub total: String,
    pub items: Vec<OrderItemLine>,
}

impl OrderDetailView {
    /// Format a placed order for display.
    #[must_use]
    pub fn new(placed: &PlacedOrder, currency: CurrencyCode) -> Self {
        let Order {
            id,
            total_amount,
            status,
            order_date,
            ..
        } = &placed.order;

        Self {
            id: id.as_i32(),
            date: order_date.format(ORDER_DATE_FORMAT).to_string(),
            status: status.to_string(),
            total: format_money(currency, *total_amount),
            items: placed
                .items
                .iter()
                .map(|item| OrderItemLine::new(item, currency))
                .collect(),
        }
    }
}

impl OrderItemLine {
    fn new(item: &OrderItemView, currency: CurrencyCode) -> Self {
        Self {
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: format_money(currency, item.price),
            line_price: format_money(currency, item.line_total()),
        }
    }
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub header: PageHeader,
    pub orders: Vec<OrderRowView>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub header: PageHeader,
    pub order: OrderDetailView,
}

/// List the user's orders, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<OrdersTemplate, AppError> {
    let currency = state.config().currency;
    let orders = OrderService::new(state.pool()).list_orders(user.id).await?;

    Ok(OrdersTemplate {
        header: PageHeader::for_user(state.pool(), &user).await?,
        orders: orders
            .iter()
            .map(|o| OrderRowView::new(o, currency))
            .collect(),
    })
}

/// Show one of the user's orders.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> Result<OrderShowTemplate, AppError> {
    let placed = OrderService::new(state.pool())
        .get_order(user.id, OrderId::new(order_id))
        .await?;

    Ok(OrderShowTemplate {
        header: PageHeader::for_user(state.pool(), &user).await?,
        order: OrderDetailView::new(&placed, state.config().currency),
    })
}
