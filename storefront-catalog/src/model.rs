//! Catalog records and their row mappings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use storefront_cart::Purchasable;
use storefront_data::{Entity, Value};
use storefront_data_sqlx::codec::{
    decimal_from_sql, decode_error, list_from_sql, timestamp_from_sql,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub stock: u32,
    pub image_urls: Vec<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Sale price if present, else the regular price.
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    pub fn on_sale(&self) -> bool {
        self.sale_price.is_some()
    }
}

impl Entity for Product {
    type Id = String;

    fn table_name() -> &'static str {
        "products"
    }

    fn id_column() -> &'static str {
        "id"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "name",
            "slug",
            "description",
            "price",
            "sale_price",
            "stock",
            "image_urls",
            "is_active",
            "is_featured",
            "category",
            "tags",
            "name_folded",
            "description_folded",
            "created_at",
            "updated_at",
        ]
    }

    fn id(&self) -> &String {
        &self.id
    }

    fn value(&self, column: &str) -> Value {
        match column {
            "id" => self.id.clone().into(),
            "name" => self.name.clone().into(),
            "slug" => self.slug.clone().into(),
            "description" => self.description.clone().into(),
            "price" => self.price.into(),
            "sale_price" => self.sale_price.into(),
            "stock" => self.stock.into(),
            "image_urls" => self.image_urls.clone().into(),
            "is_active" => self.is_active.into(),
            "is_featured" => self.is_featured.into(),
            "category" => self.category.clone().into(),
            "tags" => self.tags.clone().into(),
            "name_folded" => self.name.to_lowercase().into(),
            "description_folded" => self.description.as_deref().map(str::to_lowercase).into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => Value::Null,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Product {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let price: i64 = row.try_get("price")?;
        let sale_price: Option<i64> = row.try_get("sale_price")?;
        let image_urls: String = row.try_get("image_urls")?;
        let tags: String = row.try_get("tags")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;
        Ok(Product {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            price: decimal_from_sql(price),
            sale_price: sale_price.map(decimal_from_sql),
            stock: unsigned(row, "stock")?,
            image_urls: list_from_sql(&image_urls).map_err(|e| decode_error("image_urls", e))?,
            is_active: row.try_get("is_active")?,
            is_featured: row.try_get("is_featured")?,
            category: row.try_get("category")?,
            tags: list_from_sql(&tags).map_err(|e| decode_error("tags", e))?,
            created_at: timestamp_from_sql(&created_at)
                .map_err(|e| decode_error("created_at", e))?,
            updated_at: timestamp_from_sql(&updated_at)
                .map_err(|e| decode_error("updated_at", e))?,
        })
    }
}

impl Purchasable for Product {
    fn product_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn effective_price(&self) -> Decimal {
        Product::effective_price(self)
    }

    fn primary_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

/// Characters that change the meaning of a URL path segment.
pub const URL_DELIMITERS: [char; 4] = ['/', '?', '#', '%'];

pub const MAX_SLUG_LEN: usize = 200;

/// Slug used when a name has nothing left after separators are removed.
pub const FALLBACK_SLUG: &str = "product";

pub(crate) fn is_slug_separator(c: char) -> bool {
    c.is_whitespace() || URL_DELIMITERS.contains(&c)
}

/// Lowercase the name and join the runs between whitespace and URL
/// delimiters with a single `-`.
///
/// ```
/// use storefront_catalog::model::slugify;
/// assert_eq!(slugify("Red  Mug"), "red-mug");
/// assert_eq!(slugify("AC/DC Tee"), "ac-dc-tee");
/// ```
pub fn slugify(name: &str) -> String {
    let joined = name
        .split(is_slug_separator)
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    let slug: String = joined.chars().take(MAX_SLUG_LEN).collect();
    match slug.trim_end_matches('-') {
        "" => FALLBACK_SLUG.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Drop blank and repeated tags, keeping first occurrences in order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, garde::Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShippingAddress {
    #[garde(length(min = 1, max = 200))]
    pub street: String,
    #[garde(length(min = 1, max = 100))]
    pub city: String,
    #[garde(length(min = 1, max = 100))]
    pub state: String,
    #[garde(length(min = 1, max = 20))]
    pub zip_code: String,
    #[garde(length(min = 1, max = 100))]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    /// Loaded separately from `order_items`; empty when the order was read on its own.
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `ORD-YYYYMMDD-XXXXXX` with six random uppercase hex digits.
pub fn order_number(at: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("ORD-{}-{suffix}", at.format("%Y%m%d"))
}

impl Entity for Order {
    type Id = String;

    fn table_name() -> &'static str {
        "orders"
    }

    fn id_column() -> &'static str {
        "id"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "order_number",
            "status",
            "total",
            "customer_name",
            "customer_email",
            "customer_phone",
            "ship_street",
            "ship_city",
            "ship_state",
            "ship_zip_code",
            "ship_country",
            "payment_method",
            "payment_status",
            "created_at",
            "updated_at",
        ]
    }

    fn id(&self) -> &String {
        &self.id
    }

    fn value(&self, column: &str) -> Value {
        let address = &self.shipping_address;
        match column {
            "id" => self.id.clone().into(),
            "order_number" => self.order_number.clone().into(),
            "status" => self.status.as_str().into(),
            "total" => self.total.into(),
            "customer_name" => self.customer_name.clone().into(),
            "customer_email" => self.customer_email.clone().into(),
            "customer_phone" => self.customer_phone.clone().into(),
            "ship_street" => address.street.clone().into(),
            "ship_city" => address.city.clone().into(),
            "ship_state" => address.state.clone().into(),
            "ship_zip_code" => address.zip_code.clone().into(),
            "ship_country" => address.country.clone().into(),
            "payment_method" => self.payment_method.clone().into(),
            "payment_status" => self.payment_status.clone().into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => Value::Null,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Order {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let total: i64 = row.try_get("total")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;
        Ok(Order {
            id: row.try_get("id")?,
            order_number: row.try_get("order_number")?,
            status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".into(),
                source: Box::new(e),
            })?,
            total: decimal_from_sql(total),
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            customer_phone: row.try_get("customer_phone")?,
            shipping_address: ShippingAddress {
                street: row.try_get("ship_street")?,
                city: row.try_get("ship_city")?,
                state: row.try_get("ship_state")?,
                zip_code: row.try_get("ship_zip_code")?,
                country: row.try_get("ship_country")?,
            },
            payment_method: row.try_get("payment_method")?,
            payment_status: row.try_get("payment_status")?,
            items: Vec::new(),
            created_at: timestamp_from_sql(&created_at)
                .map_err(|e| decode_error("created_at", e))?,
            updated_at: timestamp_from_sql(&updated_at)
                .map_err(|e| decode_error("updated_at", e))?,
        })
    }
}

/// A purchased line. Name, slug, image and price are copied at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_slug: String,
    pub product_image: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
}

impl Entity for OrderItem {
    type Id = String;

    fn table_name() -> &'static str {
        "order_items"
    }

    fn id_column() -> &'static str {
        "id"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "order_id",
            "product_id",
            "product_name",
            "product_slug",
            "product_image",
            "price",
            "quantity",
        ]
    }

    fn id(&self) -> &String {
        &self.id
    }

    fn value(&self, column: &str) -> Value {
        match column {
            "id" => self.id.clone().into(),
            "order_id" => self.order_id.clone().into(),
            "product_id" => self.product_id.clone().into(),
            "product_name" => self.product_name.clone().into(),
            "product_slug" => self.product_slug.clone().into(),
            "product_image" => self.product_image.clone().into(),
            "price" => self.price.into(),
            "quantity" => self.quantity.into(),
            _ => Value::Null,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for OrderItem {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let price: i64 = row.try_get("price")?;
        Ok(OrderItem {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            product_id: row.try_get("product_id")?,
            product_name: row.try_get("product_name")?,
            product_slug: row.try_get("product_slug")?,
            product_image: row.try_get("product_image")?,
            price: decimal_from_sql(price),
            quantity: unsigned(row, "quantity")?,
        })
    }
}

fn unsigned(row: &SqliteRow, column: &str) -> Result<u32, sqlx::Error> {
    let raw: i64 = row.try_get(column)?;
    u32::try_from(raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
