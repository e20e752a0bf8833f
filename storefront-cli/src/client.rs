use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use storefront_catalog::{CheckoutRequest, FilterRequest, Order, Product};
use storefront_data::Page;

use crate::error::CliError;

/// `GET /api/shop/products/{slug}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    pub product: Product,
    pub related: Vec<Product>,
}

/// Thin JSON client for the storefront's public API.
#[derive(Debug, Clone)]
pub struct ShopClient {
    base_url: String,
    http: Client,
}

impl ShopClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn products(&self, request: &FilterRequest) -> Result<Page<Product>, CliError> {
        let url = format!("{}/api/products?{}", self.base_url, request.to_query());
        decode(self.http.get(url).send().await?).await
    }

    pub async fn product(&self, slug: &str) -> Result<ProductPage, CliError> {
        let url = format!("{}/api/shop/products/{slug}", self.base_url);
        decode(self.http.get(url).send().await?).await
    }

    pub async fn categories(&self) -> Result<Vec<String>, CliError> {
        let url = format!("{}/api/categories", self.base_url);
        decode(self.http.get(url).send().await?).await
    }

    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<Order, CliError> {
        let url = format!("{}/api/checkout", self.base_url);
        decode(self.http.post(url).json(request).send().await?).await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Success bodies decode as `T`; error bodies surface their `error` message.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CliError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
    Err(CliError::Api {
        status: status.as_u16(),
        message,
    })
}
