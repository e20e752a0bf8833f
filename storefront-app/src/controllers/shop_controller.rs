use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use storefront_catalog::Product;
use storefront_core::HttpError;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/shop/products/{slug}", get(product_page))
}

#[derive(Serialize)]
struct ProductPage {
    product: Product,
    related: Vec<Product>,
}

async fn product_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductPage>, HttpError> {
    let product = state.catalog.product_by_slug(&slug).await?;
    let related = state.catalog.related_products(&product).await;
    Ok(Json(ProductPage { product, related }))
}
