//! Product catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use grocer_core::CurrencyCode;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::routes::{PageHeader, format_money};
use crate::services::CatalogService;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCard {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image: Option<String>,
    pub price: String,
    pub stock: i32,
}

impl ProductCard {
    fn new(product: Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.as_i32(),
            price: format_money(currency, product.price),
            name: product.name,
            description: product.description.unwrap_or_default(),
            category: product.category,
            image: product.image,
            stock: product.stock,
        }
    }
}

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub header: PageHeader,
    pub products: Vec<ProductCard>,
    pub categories: Vec<String>,
    /// Active category filter, empty when showing everything.
    pub selected_category: String,
}

/// Display the product grid.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<ProductsTemplate, AppError> {
    let catalog = CatalogService::new(state.pool());
    let currency = state.config().currency;

    let category = query.category.filter(|c| !c.trim().is_empty());
    let products = catalog.list_products(category.as_deref()).await?;
    let categories = catalog.list_categories().await?;

    Ok(ProductsTemplate {
        header: PageHeader::for_user(state.pool(), &user).await?,
        products: products
            .into_iter()
            .map(|p| ProductCard::new(p, currency))
            .collect(),
        categories,
        selected_category: category.unwrap_or_default(),
    })
}
