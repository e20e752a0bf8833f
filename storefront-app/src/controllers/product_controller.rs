//! `/api/products` and `/api/categories`.

use axum::extract::{Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use storefront_catalog::{FilterRequest, Product, ProductInput, Scope};
use storefront_core::HttpError;
use storefront_data::Page;
use storefront_security::{AdminUser, Viewer};

use super::json_body;
use crate::state::AppState;

pub const PRODUCT_ID_REQUIRED: &str = "Product ID is required";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products",
            get(list)
                .post(create)
                .put(update)
                .delete(delete),
        )
        .route("/api/categories", get(categories))
}

/// Public listing. Anything other than active products needs the admin role.
async fn list(
    State(state): State<AppState>,
    viewer: Viewer,
    RawQuery(raw): RawQuery,
) -> Result<Json<Page<Product>>, HttpError> {
    let request = FilterRequest::from_query(raw.as_deref().unwrap_or_default())?;
    let scope = match &viewer {
        Viewer::Admin(_) => Scope::Admin,
        Viewer::Guest if request.active.is_restricted() => {
            return Err(HttpError::Unauthorized("Unauthorized".into()));
        }
        Viewer::Shopper(user) if request.active.is_restricted() => {
            tracing::warn!(sub = %user.sub, "non-admin asked for hidden products");
            return Err(HttpError::Forbidden("Insufficient roles".into()));
        }
        _ => Scope::Public,
    };
    let page = state.catalog.list_products(&request, scope).await?;
    Ok(Json(page))
}

async fn create(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let input: ProductInput = json_body(&body)?;
    let product = state.catalog.create_product(input).await?;
    tracing::info!(id = %product.id, by = %user.sub, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    body: Bytes,
) -> Result<Json<Product>, HttpError> {
    let input: ProductInput = json_body(&body)?;
    let id = input
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| HttpError::BadRequest(PRODUCT_ID_REQUIRED.into()))?;
    let product = state.catalog.update_product(&id, input).await?;
    tracing::info!(id = %product.id, by = %user.sub, "product updated");
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    id: Option<String>,
}

async fn delete(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Query(params): Query<DeleteParams>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| HttpError::BadRequest(PRODUCT_ID_REQUIRED.into()))?;
    state.catalog.delete_product(&id).await?;
    tracing::info!(%id, by = %user.sub, "product deleted");
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, HttpError> {
    Ok(Json(state.catalog.list_categories().await?))
}
