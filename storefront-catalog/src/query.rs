//! The product query builder: one function from a [`FilterRequest`] to the
//! gateway's [`Query`] description, shared by every listing entry point.

use storefront_data::{Condition, OrderBy, Pageable, Query};

use crate::filter::{FilterRequest, SortOption, Visibility};

/// Who is listing. Public listings only ever see active products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Public,
    Admin,
}

/// Default and maximum page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default: u64,
    pub max: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default: 12,
            max: 100,
        }
    }
}

/// A resolved listing: predicate, order and window, plus the page they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    query: Query,
    pageable: Pageable,
}

impl ProductQuery {
    /// Filter, order and window for fetching the page.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Same predicate without order or window, for the total.
    pub fn count_query(&self) -> Query {
        self.query.unwindowed()
    }

    pub fn pageable(&self) -> &Pageable {
        &self.pageable
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductQueryBuilder {
    limits: PageLimits,
}

impl ProductQueryBuilder {
    pub fn new(limits: PageLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    pub fn build(&self, request: &FilterRequest, scope: Scope) -> ProductQuery {
        let page = request.page.max(1);
        let limit = request
            .limit
            .unwrap_or(self.limits.default)
            .clamp(1, self.limits.max.max(1));
        let pageable = Pageable::new(page, limit);

        let mut query = Query::new();

        match (scope, request.active) {
            (Scope::Public, _) | (Scope::Admin, Visibility::Active) => {
                query = query.filter(Condition::eq("is_active", true));
            }
            (Scope::Admin, Visibility::Inactive) => {
                query = query.filter(Condition::eq("is_active", false));
            }
            (Scope::Admin, Visibility::All) => {}
        }

        if let Some(category) = &request.category {
            query = query.filter(Condition::eq("category", category.as_str()));
        }

        if request.min_price.is_some() || request.max_price.is_some() {
            query = query.filter(Condition::Any(vec![
                price_range("price", request),
                price_range("sale_price", request),
            ]));
        }

        // "Featured" in a listing means discounted.
        if request.featured == Some(true) {
            query = query.filter(Condition::is_not_null("sale_price"));
        }

        // Name and description are matched through their lowercased copies,
        // which keeps non-ASCII matching identical across backends.
        if let Some(term) = request.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(Condition::Any(vec![
                Condition::contains("name_folded", term),
                Condition::contains("description_folded", term),
                Condition::has_element("tags", term),
            ]));
        }

        for order in sort_order(request.sort) {
            query = query.order_by(order);
        }

        query = query.offset(pageable.offset()).limit(limit);
        ProductQuery { query, pageable }
    }
}

fn price_range(column: &str, request: &FilterRequest) -> Condition {
    let mut bounds = Vec::with_capacity(2);
    if let Some(min) = request.min_price {
        bounds.push(Condition::gte(column, min));
    }
    if let Some(max) = request.max_price {
        bounds.push(Condition::lte(column, max));
    }
    Condition::All(bounds)
}

/// Price sorts go by sale price (missing ones last) and then regular price.
/// `id` is always the final key so pages never overlap.
fn sort_order(sort: SortOption) -> Vec<OrderBy> {
    let mut order = match sort {
        SortOption::PriceAsc => vec![
            OrderBy::asc("sale_price").nulls_last(),
            OrderBy::asc("price"),
        ],
        SortOption::PriceDesc => vec![
            OrderBy::desc("sale_price").nulls_last(),
            OrderBy::desc("price"),
        ],
        SortOption::Newest => vec![OrderBy::desc("created_at")],
        SortOption::Oldest => vec![OrderBy::asc("created_at")],
    };
    order.push(OrderBy::asc("id"));
    order
}
