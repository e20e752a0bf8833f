pub mod account_controller;
pub mod admin_controller;
pub mod checkout_controller;
pub mod order_controller;
pub mod product_controller;
pub mod shop_controller;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use storefront_core::HttpError;

/// Decode a JSON request body. Malformed bodies are a 400 with the serde
/// message, not axum's 422.
pub(crate) fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, HttpError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejected request body");
        HttpError::BadRequest(format!("Invalid request body: {e}"))
    })
}

/// `?page=` on admin actions, selecting which page of the table to refresh.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageParam {
    pub page: Option<u64>,
}

impl PageParam {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }
}
