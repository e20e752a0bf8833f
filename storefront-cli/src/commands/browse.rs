use storefront_catalog::{FilterRequest, Product, SortOption};
use storefront_data::Page;

use crate::client::{ProductPage, ShopClient};
use crate::error::CliError;

/// Listing flags as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct BrowseArgs {
    pub page: u64,
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub featured: bool,
    pub sort: Option<String>,
    pub search: Option<String>,
}

impl BrowseArgs {
    /// Go through the same parser the server uses so that bad input is
    /// reported before any request is made.
    pub fn to_filter(&self) -> Result<FilterRequest, CliError> {
        let mut pairs: Vec<(&str, String)> = vec![("page", self.page.max(1).to_string())];
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(min) = &self.min_price {
            pairs.push(("minPrice", min.clone()));
        }
        if let Some(max) = &self.max_price {
            pairs.push(("maxPrice", max.clone()));
        }
        if self.featured {
            pairs.push(("featured", "true".into()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        let mut request = FilterRequest::from_pairs(pairs)
            .map_err(|e| CliError::Input(e.public_message()))?;
        if let Some(sort) = &self.sort {
            request.sort = SortOption::parse_lenient(sort);
        }
        Ok(request)
    }
}

pub async fn browse(client: &ShopClient, args: &BrowseArgs) -> Result<Page<Product>, CliError> {
    client.products(&args.to_filter()?).await
}

pub async fn show(client: &ShopClient, slug: &str) -> Result<ProductPage, CliError> {
    client.product(slug).await
}

pub async fn categories(client: &ShopClient) -> Result<Vec<String>, CliError> {
    client.categories().await
}
