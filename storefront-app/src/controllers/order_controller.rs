use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use serde::Deserialize;
use storefront_catalog::{Order, OrderStatus, StatusUpdate};
use storefront_core::HttpError;
use storefront_data::{Page, Pageable};
use storefront_security::AdminUser;

use super::json_body;
use crate::state::AppState;

const ORDER_PAGE_SIZE: u64 = 20;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/orders", get(list))
        .route("/api/admin/orders/{id}", get(show).put(update_status))
}

#[derive(Debug, Deserialize)]
struct OrderListParams {
    page: Option<u64>,
    limit: Option<u64>,
    status: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<OrderListParams>,
) -> Result<Json<Page<Order>>, HttpError> {
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<OrderStatus>()
                .map_err(|e| HttpError::BadRequest(e.to_string()))?,
        ),
    };
    let pageable = Pageable::new(
        params.page.unwrap_or(1).max(1),
        params
            .limit
            .unwrap_or(ORDER_PAGE_SIZE)
            .clamp(1, state.max_page_size),
    );
    Ok(Json(state.orders.list_orders(pageable, status).await?))
}

async fn show(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Order>, HttpError> {
    Ok(Json(state.orders.get_order(&id).await?))
}

async fn update_status(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Order>, HttpError> {
    let update: StatusUpdate = json_body(&body)?;
    let order = state.orders.update_status(&id, update.status).await?;
    tracing::info!(%id, by = %user.sub, status = %order.status, "order updated");
    Ok(Json(order))
}
