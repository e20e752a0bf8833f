use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use storefront_catalog::CheckoutRequest;
use storefront_core::HttpError;

use super::json_body;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/checkout", post(checkout))
}

async fn checkout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let request: CheckoutRequest = json_body(&body)?;
    let order = state.orders.place_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
