//! Product request bodies and their coercion into validated field sets.
//!
//! [`ProductInput`] is the wire shape shared by the create, update and admin
//! form endpoints. Unknown keys are rejected when it is deserialized. Numbers
//! may arrive as JSON numbers or numeric strings. Coercion produces a
//! [`ProductFields`], which is then checked with `garde` and for the
//! `salePrice < price` invariant before anything is written.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use storefront_core::validation::{validate, FieldError, ValidationErrorResponse};
use storefront_data_sqlx::codec::{is_storable_decimal, MONEY_SCALE};

use crate::error::CatalogError;
use crate::model::{is_slug_separator, normalize_tags, slugify, Product};

pub const NAME_AND_PRICE_REQUIRED: &str = "Name and price are required";
pub const INVALID_PRICE: &str = "Price must be a valid positive number";
pub const INVALID_SALE_PRICE: &str = "Sale price must be a valid positive number or empty";
pub const INVALID_STOCK: &str = "Stock must be a valid positive integer";
pub const SALE_NOT_BELOW_PRICE: &str = "Sale price must be less than regular price";
pub const PRICE_OUT_OF_RANGE: &str =
    "Prices must not exceed 99999999.99 or have more than 2 decimal places";
pub const SLUG_NOT_URL_SAFE: &str = "Slug must not contain spaces or any of / ? # %";

/// Largest accepted price. Kept well below what a decimal column holds so
/// that price times quantity stays representable at checkout.
pub fn max_price() -> Decimal {
    Decimal::new(9_999_999_999, MONEY_SCALE)
}

/// A number that may have been sent as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumberInput {
    fn is_blank(&self) -> bool {
        matches!(self, NumberInput::Text(s) if s.trim().is_empty())
    }

    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            NumberInput::Number(n) => parse_decimal(&n.to_string()),
            NumberInput::Text(s) => parse_decimal(s),
        }
    }

    fn to_integer(&self) -> Option<i64> {
        match self {
            NumberInput::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            NumberInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<Decimal> for NumberInput {
    fn from(d: Decimal) -> Self {
        NumberInput::Text(d.to_string())
    }
}

impl From<u32> for NumberInput {
    fn from(n: u32) -> Self {
        NumberInput::Number(n.into())
    }
}

/// Plain or scientific decimal notation. Surrounding whitespace is ignored.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Distinguish an absent key (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Product fields as sent by a client. Every key is optional on the wire;
/// which ones are required depends on whether this creates or updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductInput {
    /// Present on update and on admin form edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<NumberInput>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sale_price: Option<Option<NumberInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<NumberInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Every writable product field after coercion.
#[derive(Debug, Clone, PartialEq, garde::Validate)]
pub struct ProductFields {
    #[garde(length(min = 1, max = 200))]
    pub name: String,
    #[garde(length(min = 1, max = 200))]
    pub slug: String,
    #[garde(length(max = 5000))]
    pub description: Option<String>,
    #[garde(skip)]
    pub price: Decimal,
    #[garde(skip)]
    pub sale_price: Option<Decimal>,
    #[garde(skip)]
    pub stock: u32,
    #[garde(length(max = 20), inner(length(min = 1, max = 2048)))]
    pub image_urls: Vec<String>,
    #[garde(skip)]
    pub is_active: bool,
    #[garde(skip)]
    pub is_featured: bool,
    #[garde(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[garde(length(max = 50), inner(length(min = 1, max = 50)))]
    pub tags: Vec<String>,
}

/// Slugs derived from a name are URL-safe already; only client-chosen ones
/// are checked.
fn client_slug(slug: String) -> Result<String, CatalogError> {
    if slug.chars().any(is_slug_separator) {
        return Err(CatalogError::validation("slug", SLUG_NOT_URL_SAFE));
    }
    Ok(slug)
}

impl ProductFields {
    /// Coerce a create request. `name` and `price` are required.
    pub fn for_create(input: ProductInput) -> Result<Self, CatalogError> {
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let price = input.price.as_ref().filter(|p| !p.is_blank());
        let (name, price) = match (name, price) {
            (Some(name), Some(price)) => (name, price),
            (None, _) => return Err(CatalogError::validation("name", NAME_AND_PRICE_REQUIRED)),
            (_, None) => return Err(CatalogError::validation("price", NAME_AND_PRICE_REQUIRED)),
        };

        let slug = match non_blank(input.slug) {
            Some(slug) => client_slug(slug)?,
            None => slugify(&name),
        };
        let fields = ProductFields {
            price: coerce_price(price)?,
            sale_price: coerce_sale_price(input.sale_price.flatten().as_ref())?,
            stock: match input.stock.as_ref().filter(|s| !s.is_blank()) {
                Some(stock) => coerce_stock(stock)?,
                None => 0,
            },
            name,
            slug,
            description: non_blank(input.description.flatten()),
            image_urls: input.image_urls.unwrap_or_default(),
            is_active: input.is_active.unwrap_or(true),
            is_featured: input.is_featured.unwrap_or(false),
            category: non_blank(input.category.flatten()),
            tags: normalize_tags(input.tags.unwrap_or_default()),
        };
        fields.check()?;
        Ok(fields)
    }

    /// Merge an update onto an existing product. Absent keys keep the
    /// current value; `salePrice: null` or `""` clears the sale price.
    /// The price invariant is checked on the merged result.
    pub fn for_update(existing: &Product, input: ProductInput) -> Result<Self, CatalogError> {
        let mut fields = ProductFields::from(existing);

        if let Some(name) = input.name {
            fields.name = name.trim().to_string();
            if fields.name.is_empty() {
                return Err(CatalogError::validation("name", "Name cannot be empty"));
            }
        }
        if let Some(slug) = input.slug {
            fields.slug = match non_blank(Some(slug)) {
                Some(slug) => client_slug(slug)?,
                None => slugify(&fields.name),
            };
        }
        if let Some(description) = input.description {
            fields.description = non_blank(description);
        }
        if let Some(price) = &input.price {
            fields.price = coerce_price(price)?;
        }
        if let Some(sale_price) = &input.sale_price {
            fields.sale_price = coerce_sale_price(sale_price.as_ref())?;
        }
        if let Some(stock) = &input.stock {
            fields.stock = coerce_stock(stock)?;
        }
        if let Some(image_urls) = input.image_urls {
            fields.image_urls = image_urls;
        }
        if let Some(is_active) = input.is_active {
            fields.is_active = is_active;
        }
        if let Some(is_featured) = input.is_featured {
            fields.is_featured = is_featured;
        }
        if let Some(category) = input.category {
            fields.category = non_blank(category);
        }
        if let Some(tags) = input.tags {
            fields.tags = normalize_tags(tags);
        }

        fields.check()?;
        Ok(fields)
    }

    fn check(&self) -> Result<(), CatalogError> {
        validate(self)?;
        if let Some(sale) = self.sale_price {
            if sale >= self.price {
                return Err(CatalogError::Validation(ValidationErrorResponse {
                    errors: vec![FieldError::new("salePrice", SALE_NOT_BELOW_PRICE)],
                }));
            }
        }
        Ok(())
    }

    /// Write these fields onto a product, leaving id and timestamps alone.
    pub fn apply_to(self, product: &mut Product) {
        product.name = self.name;
        product.slug = self.slug;
        product.description = self.description;
        product.price = self.price;
        product.sale_price = self.sale_price;
        product.stock = self.stock;
        product.image_urls = self.image_urls;
        product.is_active = self.is_active;
        product.is_featured = self.is_featured;
        product.category = self.category;
        product.tags = self.tags;
    }
}

impl From<&Product> for ProductFields {
    fn from(p: &Product) -> Self {
        ProductFields {
            name: p.name.clone(),
            slug: p.slug.clone(),
            description: p.description.clone(),
            price: p.price,
            sale_price: p.sale_price,
            stock: p.stock,
            image_urls: p.image_urls.clone(),
            is_active: p.is_active,
            is_featured: p.is_featured,
            category: p.category.clone(),
            tags: p.tags.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Whether `amount` is a price the catalog can store and charge exactly.
pub fn is_valid_price(amount: &Decimal) -> bool {
    !amount.is_sign_negative() && *amount <= max_price() && is_storable_decimal(amount)
}

fn in_price_range(field: &str, amount: Decimal) -> Result<Decimal, CatalogError> {
    if is_valid_price(&amount) {
        Ok(amount)
    } else {
        Err(CatalogError::validation(field, PRICE_OUT_OF_RANGE))
    }
}

fn coerce_price(input: &NumberInput) -> Result<Decimal, CatalogError> {
    match input.to_decimal() {
        Some(d) if !d.is_sign_negative() => in_price_range("price", d),
        _ => Err(CatalogError::validation("price", INVALID_PRICE)),
    }
}

fn coerce_sale_price(input: Option<&NumberInput>) -> Result<Option<Decimal>, CatalogError> {
    match input {
        None => Ok(None),
        Some(n) if n.is_blank() => Ok(None),
        Some(n) => match n.to_decimal() {
            Some(d) if !d.is_sign_negative() => in_price_range("salePrice", d).map(Some),
            _ => Err(CatalogError::validation("salePrice", INVALID_SALE_PRICE)),
        },
    }
}

fn coerce_stock(input: &NumberInput) -> Result<u32, CatalogError> {
    input
        .to_integer()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| CatalogError::validation("stock", INVALID_STOCK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: serde_json::Value) -> ProductInput {
        serde_json::from_value(value).unwrap()
    }

    fn message(err: CatalogError) -> String {
        err.public_message()
    }

    #[test]
    fn create_requires_name_and_price() {
        for body in [
            json!({ "price": 10 }),
            json!({ "name": "   ", "price": 10 }),
            json!({ "name": "Mug" }),
            json!({ "name": "Mug", "price": "" }),
        ] {
            let err = ProductFields::for_create(input(body)).unwrap_err();
            assert_eq!(message(err), NAME_AND_PRICE_REQUIRED);
        }
    }

    #[test]
    fn create_applies_defaults_and_derives_slug() {
        let fields = ProductFields::for_create(input(json!({ "name": "Red Mug", "price": 12.5 })))
            .unwrap();
        assert_eq!(fields.slug, "red-mug");
        assert_eq!(fields.price, Decimal::new(125, 1));
        assert_eq!(fields.stock, 0);
        assert!(fields.is_active);
        assert!(!fields.is_featured);
        assert!(fields.image_urls.is_empty());
        assert!(fields.tags.is_empty());
        assert_eq!(fields.sale_price, None);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let fields = ProductFields::for_create(input(json!({
            "name": "Mug",
            "price": " 19.99 ",
            "salePrice": "9.5",
            "stock": "7"
        })))
        .unwrap();
        assert_eq!(fields.price, Decimal::new(1999, 2));
        assert_eq!(fields.sale_price, Some(Decimal::new(95, 1)));
        assert_eq!(fields.stock, 7);
    }

    #[test]
    fn rejects_bad_numbers() {
        let cases = [
            (json!({ "name": "Mug", "price": "abc" }), INVALID_PRICE),
            (json!({ "name": "Mug", "price": -1 }), INVALID_PRICE),
            (json!({ "name": "Mug", "price": 5, "salePrice": "x" }), INVALID_SALE_PRICE),
            (json!({ "name": "Mug", "price": 5, "stock": -2 }), INVALID_STOCK),
            (json!({ "name": "Mug", "price": 5, "stock": "2.5" }), INVALID_STOCK),
            (json!({ "name": "Mug", "price": 5, "salePrice": 5 }), SALE_NOT_BELOW_PRICE),
        ];
        for (body, expected) in cases {
            let err = ProductFields::for_create(input(body.clone())).unwrap_err();
            assert_eq!(message(err), expected, "{body}");
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed = serde_json::from_value::<ProductInput>(json!({ "name": "Mug", "colour": "red" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn null_and_absent_are_distinct() {
        let cleared = input(json!({ "salePrice": null }));
        assert_eq!(cleared.sale_price, Some(None));
        let untouched = input(json!({}));
        assert_eq!(untouched.sale_price, None);
    }

    #[test]
    fn client_slug_with_delimiters_fails_validation() {
        for slug in ["red mug", "red/mug", "50%"] {
            let err = ProductFields::for_create(input(json!({
                "name": "Mug",
                "price": 5,
                "slug": slug
            })))
            .unwrap_err();
            assert_eq!(message(err), SLUG_NOT_URL_SAFE, "{slug}");
        }
    }

    #[test]
    fn names_with_url_delimiters_get_a_clean_slug() {
        for (name, slug) in [
            ("50% Off Mug", "50-off-mug"),
            ("AC/DC Tee", "ac-dc-tee"),
            ("What? Mug", "what-mug"),
            ("Mug #1", "mug-1"),
        ] {
            let fields =
                ProductFields::for_create(input(json!({ "name": name, "price": 10 }))).unwrap();
            assert_eq!(fields.slug, slug);
            assert_eq!(fields.name, name);
        }
    }

    #[test]
    fn prices_are_bounded_and_kept_to_cents() {
        for body in [
            json!({ "name": "Mug", "price": "10.0000004" }),
            json!({ "name": "Mug", "price": "100000000" }),
            json!({ "name": "Mug", "price": 10, "salePrice": "9.999" }),
            json!({ "name": "Mug", "price": "1e20" }),
        ] {
            let err = ProductFields::for_create(input(body.clone())).unwrap_err();
            assert_eq!(message(err), PRICE_OUT_OF_RANGE, "{body}");
        }
        let fields = ProductFields::for_create(input(json!({
            "name": "Mug",
            "price": "99999999.99",
            "salePrice": "10.500"
        })))
        .unwrap();
        assert_eq!(fields.price, max_price());
        assert_eq!(fields.sale_price, Some(Decimal::new(105, 1)));
    }
}
