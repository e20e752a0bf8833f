//! Parsing of listing query strings into a typed [`FilterRequest`].
//!
//! Every listing entry point (shop API, admin list, CLI) goes through
//! [`FilterRequest::from_query`]. Empty values count as absent. Malformed
//! values are rejected, except `sort`, which falls back to `newest`.

use std::str::FromStr;

use rust_decimal::Decimal;
use storefront_data_sqlx::codec::is_storable_decimal;

use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    PriceAsc,
    PriceDesc,
    #[default]
    Newest,
    Oldest,
}

impl SortOption {
    /// Unrecognized values resolve to [`SortOption::Newest`].
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim() {
            "price-asc" => SortOption::PriceAsc,
            "price-desc" => SortOption::PriceDesc,
            "oldest" => SortOption::Oldest,
            _ => SortOption::Newest,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::Newest => "newest",
            SortOption::Oldest => "oldest",
        }
    }
}

/// Which products a listing may show, by `isActive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Active,
    Inactive,
    All,
}

impl Visibility {
    /// Anything other than the default requires an admin.
    pub fn is_restricted(self) -> bool {
        self != Visibility::Active
    }
}

impl FromStr for Visibility {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "true" => Ok(Visibility::Active),
            "false" => Ok(Visibility::Inactive),
            "all" => Ok(Visibility::All),
            _ => Err(CatalogError::validation(
                "active",
                "active must be one of true, false, all",
            )),
        }
    }
}

/// A listing request after parsing. `limit` stays unresolved until the
/// query builder applies the configured default and cap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterRequest {
    pub page: u64,
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub featured: Option<bool>,
    pub sort: SortOption,
    pub search: Option<String>,
    pub active: Visibility,
}

impl FilterRequest {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    /// Parse a raw `application/x-www-form-urlencoded` query string.
    /// Unknown keys are ignored; for repeated keys the last one wins.
    pub fn from_query(raw: &str) -> Result<Self, CatalogError> {
        Self::from_pairs(form_urlencoded::parse(raw.as_bytes()))
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, CatalogError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = FilterRequest::new();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "page" => request.page = positive_int("page", value)?,
                "limit" => request.limit = Some(positive_int("limit", value)?),
                "category" => request.category = Some(value.to_string()),
                "minPrice" => request.min_price = Some(price_bound("minPrice", value)?),
                "maxPrice" => request.max_price = Some(price_bound("maxPrice", value)?),
                "featured" => request.featured = Some(boolean("featured", value)?),
                "sort" => request.sort = SortOption::parse_lenient(value),
                "search" => request.search = Some(value.to_string()),
                "active" => request.active = value.parse()?,
                _ => {}
            }
        }
        Ok(request)
    }

    /// Query-string form, used by clients that build listing URLs.
    pub fn to_query(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        out.append_pair("page", &self.page.to_string());
        if let Some(limit) = self.limit {
            out.append_pair("limit", &limit.to_string());
        }
        if let Some(category) = &self.category {
            out.append_pair("category", category);
        }
        if let Some(min) = self.min_price {
            out.append_pair("minPrice", &min.to_string());
        }
        if let Some(max) = self.max_price {
            out.append_pair("maxPrice", &max.to_string());
        }
        if let Some(featured) = self.featured {
            out.append_pair("featured", if featured { "true" } else { "false" });
        }
        if self.sort != SortOption::Newest {
            out.append_pair("sort", self.sort.as_str());
        }
        if let Some(search) = &self.search {
            out.append_pair("search", search);
        }
        match self.active {
            Visibility::Active => {}
            Visibility::Inactive => {
                out.append_pair("active", "false");
            }
            Visibility::All => {
                out.append_pair("active", "all");
            }
        }
        out.finish()
    }
}

fn positive_int(field: &str, raw: &str) -> Result<u64, CatalogError> {
    match raw.parse::<u64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CatalogError::validation(
            field,
            format!("{field} must be a positive integer"),
        )),
    }
}

/// Bounds are compared against stored prices, so they follow the same
/// cents precision and range.
fn price_bound(field: &str, raw: &str) -> Result<Decimal, CatalogError> {
    match crate::payload::parse_decimal(raw) {
        Some(d) if !d.is_sign_negative() && is_storable_decimal(&d) => Ok(d),
        _ => Err(CatalogError::validation(
            field,
            format!("{field} must be a non-negative amount with at most 2 decimal places"),
        )),
    }
}

fn boolean(field: &str, raw: &str) -> Result<bool, CatalogError> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(CatalogError::validation(
            field,
            format!("{field} must be true or false"),
        )),
    }
}
