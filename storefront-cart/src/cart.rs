use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CartError;

/// Image shown for products that have none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-product.jpg";

/// Anything that can be put in a cart.
pub trait Purchasable {
    fn product_id(&self) -> &str;
    fn display_name(&self) -> &str;
    /// Sale price if present, else regular price.
    fn effective_price(&self) -> Decimal;
    fn primary_image(&self) -> Option<&str>;
}

/// One cart line. `price` is the effective price when the line was first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image_url: String,
}

impl CartItem {
    pub fn line_total(&self) -> Result<Decimal, CartError> {
        self.price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| CartError::Overflow(self.product_id.clone()))
    }
}

/// Client-held cart: at most one line per product, in insertion order.
///
/// Serialized as a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Add `quantity` of a product. An existing line keeps its snapshotted
    /// price and only grows; a new line captures the current effective price.
    pub fn add_item(&mut self, product: &impl Purchasable, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.product_id())
        {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }
        self.items.push(CartItem {
            product_id: product.product_id().to_string(),
            name: product.display_name().to_string(),
            price: product.effective_price(),
            quantity,
            image_url: product
                .primary_image()
                .filter(|url| !url.is_empty())
                .unwrap_or(PLACEHOLDER_IMAGE)
                .to_string(),
        });
    }

    /// Set a line's quantity. Quantities below 1 and unknown ids leave the cart unchanged.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity < 1 {
            return;
        }
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            line.quantity = quantity;
        }
    }

    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|item| item.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all lines.
    pub fn subtotal(&self) -> Result<Decimal, CartError> {
        self.items.iter().try_fold(Decimal::ZERO, |acc, item| {
            acc.checked_add(item.line_total()?)
                .ok_or_else(|| CartError::Overflow(item.product_id.clone()))
        })
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn summary(&self) -> Result<CheckoutSummary, CartError> {
        let subtotal = self.subtotal()?;
        Ok(CheckoutSummary {
            subtotal,
            shipping: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: subtotal,
            item_count: self.item_count(),
        })
    }
}

/// Order summary shown before checkout. Shipping and tax are not charged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub item_count: u64,
}
