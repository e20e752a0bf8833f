//! Order listing, status changes and checkout.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::validation::{validate, FieldError, ValidationErrorResponse};
use storefront_data::{Condition, OrderBy, Page, Pageable, Query, Repository};
use storefront_data_sqlx::codec::{is_storable_decimal, timestamp_now};

use crate::error::{CatalogError, DataResultExt};
use crate::model::{order_number, Order, OrderItem, OrderStatus, Product, ShippingAddress};

pub const ORDER_NOT_FOUND: &str = "Order not found";
pub const ORDER_TOTAL_TOO_LARGE: &str = "Order total is too large";

/// One cart line submitted for checkout. The price is not trusted from the
/// client; the live effective price is charged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, garde::Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheckoutLine {
    #[garde(length(min = 1))]
    pub product_id: String,
    #[garde(range(min = 1))]
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, garde::Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheckoutRequest {
    #[garde(length(min = 1, max = 200))]
    pub customer_name: String,
    #[garde(email)]
    pub customer_email: String,
    #[serde(default)]
    #[garde(length(max = 40))]
    pub customer_phone: Option<String>,
    #[garde(dive)]
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    #[garde(length(max = 50))]
    pub payment_method: Option<String>,
    #[garde(length(min = 1), dive)]
    pub items: Vec<CheckoutLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

#[derive(Clone)]
pub struct OrderService<O, I, P> {
    orders: O,
    items: I,
    products: P,
}

impl<O, I, P> OrderService<O, I, P>
where
    O: Repository<Order>,
    I: Repository<OrderItem>,
    P: Repository<Product>,
{
    pub fn new(orders: O, items: I, products: P) -> Self {
        Self {
            orders,
            items,
            products,
        }
    }

    /// Newest first, optionally restricted to one status.
    pub async fn list_orders(
        &self,
        pageable: Pageable,
        status: Option<OrderStatus>,
    ) -> Result<Page<Order>, CatalogError> {
        let mut query = Query::new();
        if let Some(status) = status {
            query = query.filter(Condition::eq("status", status.as_str()));
        }
        let windowed = query
            .clone()
            .order_by(OrderBy::desc("created_at"))
            .order_by(OrderBy::asc("id"))
            .offset(pageable.offset())
            .limit(pageable.limit);

        let orders = self.orders.find(&windowed).await.context("fetch orders")?;
        let total = self.orders.count(&query).await.context("fetch orders")?;

        let mut with_items = Vec::with_capacity(orders.len());
        for mut order in orders {
            order.items = self.items_of(&order.id, "fetch orders").await?;
            with_items.push(order);
        }
        Ok(Page::new(with_items, &pageable, total))
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, CatalogError> {
        let mut order = self
            .orders
            .find_by_id(&id.to_string())
            .await
            .context("fetch order")?
            .ok_or_else(|| CatalogError::NotFound(ORDER_NOT_FOUND.into()))?;
        order.items = self.items_of(&order.id, "fetch order").await?;
        Ok(order)
    }

    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Order, CatalogError> {
        let mut order = self
            .orders
            .find_by_id(&id.to_string())
            .await
            .context("update order")?
            .ok_or_else(|| CatalogError::NotFound(ORDER_NOT_FOUND.into()))?;
        let previous = order.status;
        order.status = status;
        order.updated_at = timestamp_now();
        let mut order = self.orders.update(&order).await.context("update order")?;
        order.items = self.items_of(&order.id, "update order").await?;
        tracing::info!(id, %previous, %status, "order status changed");
        Ok(order)
    }

    /// Check every line against the live catalog, charge current effective
    /// prices, then write the order, its items and the reduced stock.
    ///
    /// The writes are not wrapped in a transaction. Stock is re-read per
    /// line, so two concurrent checkouts can still oversell.
    pub async fn place_order(&self, request: CheckoutRequest) -> Result<Order, CatalogError> {
        validate(&request)?;

        let mut quantities: BTreeMap<String, u32> = BTreeMap::new();
        for line in &request.items {
            let qty = quantities.entry(line.product_id.clone()).or_default();
            *qty = qty.saturating_add(line.quantity);
        }

        let mut problems = Vec::new();
        let mut lines = Vec::with_capacity(quantities.len());
        for (product_id, quantity) in quantities {
            let product = self
                .products
                .find_by_id(&product_id)
                .await
                .context("place order")?;
            match product {
                Some(p) if p.is_active && p.stock >= quantity => lines.push((p, quantity)),
                Some(p) if p.is_active => problems.push(FieldError::new(
                    "items",
                    format!("Only {} of {} left in stock", p.stock, p.name),
                )),
                _ => problems.push(FieldError::new(
                    "items",
                    format!("Product {product_id} is no longer available"),
                )),
            }
        }
        if !problems.is_empty() {
            return Err(CatalogError::Validation(ValidationErrorResponse {
                errors: problems,
            }));
        }

        let now = timestamp_now();
        let order_id = uuid::Uuid::new_v4().to_string();
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|(product, quantity)| OrderItem {
                id: uuid::Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                product_slug: product.slug.clone(),
                product_image: product.image_urls.first().cloned(),
                price: product.effective_price(),
                quantity: *quantity,
            })
            .collect();
        let total = order_total(&items)
            .ok_or_else(|| CatalogError::validation("items", ORDER_TOTAL_TOO_LARGE))?;

        let order = Order {
            id: order_id,
            order_number: order_number(now),
            status: OrderStatus::Pending,
            total,
            customer_name: request.customer_name.trim().to_string(),
            customer_email: request.customer_email.trim().to_string(),
            customer_phone: request.customer_phone,
            shipping_address: request.shipping_address,
            payment_method: request.payment_method,
            payment_status: Some("PENDING".to_string()),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let mut order = self.orders.insert(&order).await.context("place order")?;

        for item in &items {
            self.items.insert(item).await.context("place order")?;
        }
        for (mut product, quantity) in lines {
            product.stock -= quantity;
            product.updated_at = now;
            self.products.update(&product).await.context("place order")?;
        }

        order.items = items;
        tracing::info!(
            order = %order.order_number,
            total = %order.total,
            lines = order.items.len(),
            "order placed"
        );
        Ok(order)
    }

    async fn items_of(
        &self,
        order_id: &str,
        context: &'static str,
    ) -> Result<Vec<OrderItem>, CatalogError> {
        let query = Query::new()
            .filter(Condition::eq("order_id", order_id))
            .order_by(OrderBy::asc("product_name"));
        self.items.find(&query).await.context(context)
    }
}

/// Sum of line totals, or `None` when it overflows or cannot be stored.
fn order_total(items: &[OrderItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| {
            acc.checked_add(item.price.checked_mul(Decimal::from(item.quantity))?)
        })
        .filter(is_storable_decimal)
}
