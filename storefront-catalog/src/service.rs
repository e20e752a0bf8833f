use storefront_data::{Condition, OrderBy, Page, Query, Repository, Value};
use storefront_data_sqlx::codec::timestamp_now;

use crate::error::{CatalogError, DataResultExt};
use crate::filter::FilterRequest;
use crate::model::{OrderItem, Product};
use crate::payload::{ProductFields, ProductInput};
use crate::query::{ProductQueryBuilder, Scope};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const PRODUCT_IN_ORDERS: &str = "Product cannot be deleted as it exists in orders";
pub const SLUG_TAKEN: &str = "A product with this slug already exists";

const RELATED_LIMIT: u64 = 4;

/// Product reads and writes over a product gateway and an order-item gateway.
///
/// ```ignore
/// let catalog = CatalogService::new(products, order_items, ProductQueryBuilder::default());
/// let page = catalog.list_products(&FilterRequest::from_query("sort=price-asc")?, Scope::Public).await?;
/// ```
#[derive(Clone)]
pub struct CatalogService<P, I> {
    products: P,
    order_items: I,
    queries: ProductQueryBuilder,
}

impl<P, I> CatalogService<P, I>
where
    P: Repository<Product>,
    I: Repository<OrderItem>,
{
    pub fn new(products: P, order_items: I, queries: ProductQueryBuilder) -> Self {
        Self {
            products,
            order_items,
            queries,
        }
    }

    pub fn products(&self) -> &P {
        &self.products
    }

    pub fn query_builder(&self) -> &ProductQueryBuilder {
        &self.queries
    }

    /// One page of products plus the total for the same predicate.
    ///
    /// The page and the total are two separate reads; a write landing in
    /// between can make them disagree.
    pub async fn list_products(
        &self,
        request: &FilterRequest,
        scope: Scope,
    ) -> Result<Page<Product>, CatalogError> {
        let built = self.queries.build(request, scope);
        let items = self
            .products
            .find(built.query())
            .await
            .context("fetch products")?;
        let total = self
            .products
            .count(&built.count_query())
            .await
            .context("fetch products")?;
        tracing::debug!(
            page = built.pageable().page,
            limit = built.pageable().limit,
            total,
            ?scope,
            "listed products"
        );
        Ok(Page::new(items, built.pageable(), total))
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, CatalogError> {
        self.products
            .find_by_id(&id.to_string())
            .await
            .context("fetch product")?
            .ok_or_else(|| CatalogError::NotFound(PRODUCT_NOT_FOUND.into()))
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let fields = ProductFields::for_create(input)?;
        self.ensure_slug_free(&fields.slug, None).await?;

        let now = timestamp_now();
        let mut product = Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: String::new(),
            slug: String::new(),
            description: None,
            price: Default::default(),
            sale_price: None,
            stock: 0,
            image_urls: Vec::new(),
            is_active: true,
            is_featured: false,
            category: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        fields.apply_to(&mut product);

        let product = self
            .products
            .insert(&product)
            .await
            .map_err(|e| slug_conflict(CatalogError::from_data("create product", e)))?;
        tracing::info!(id = %product.id, slug = %product.slug, "product created");
        Ok(product)
    }

    /// Apply only the fields present in `input`.
    pub async fn update_product(
        &self,
        id: &str,
        input: ProductInput,
    ) -> Result<Product, CatalogError> {
        let mut product = self
            .products
            .find_by_id(&id.to_string())
            .await
            .context("update product")?
            .ok_or_else(|| CatalogError::NotFound(PRODUCT_NOT_FOUND.into()))?;

        let fields = ProductFields::for_update(&product, input)?;
        if fields.slug != product.slug {
            self.ensure_slug_free(&fields.slug, Some(id)).await?;
        }
        fields.apply_to(&mut product);
        product.updated_at = timestamp_now();

        let product = self
            .products
            .update(&product)
            .await
            .map_err(|e| slug_conflict(CatalogError::from_data("update product", e)))?;
        tracing::info!(id = %product.id, "product updated");
        Ok(product)
    }

    /// Refused while any order item references the product. The check and
    /// the delete are separate calls.
    pub async fn delete_product(&self, id: &str) -> Result<(), CatalogError> {
        let references = self
            .order_items
            .count(&Query::new().filter(Condition::eq("product_id", id)))
            .await
            .context("delete product")?;
        if references > 0 {
            tracing::warn!(id, references, "refusing to delete ordered product");
            return Err(CatalogError::Conflict(PRODUCT_IN_ORDERS.into()));
        }

        let deleted = self
            .products
            .delete(&id.to_string())
            .await
            .context("delete product")?;
        if !deleted {
            return Err(CatalogError::NotFound(PRODUCT_NOT_FOUND.into()));
        }
        tracing::info!(id, "product deleted");
        Ok(())
    }

    /// Distinct categories of active products, sorted.
    pub async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        let values = self
            .products
            .distinct("category", &Query::new().filter(Condition::eq("is_active", true)))
            .await
            .context("fetch categories")?;
        Ok(values
            .into_iter()
            .filter_map(|v| match v {
                Value::Text(s) => Some(s),
                _ => None,
            })
            .collect())
    }

    /// An active product by slug.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, CatalogError> {
        let query = Query::new()
            .filter(Condition::eq("slug", slug))
            .filter(Condition::eq("is_active", true))
            .limit(1);
        self.products
            .find(&query)
            .await
            .context("fetch product")?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(PRODUCT_NOT_FOUND.into()))
    }

    /// Up to four other active products in the same category. Failures are
    /// logged and yield an empty list, so a product page still renders.
    pub async fn related_products(&self, product: &Product) -> Vec<Product> {
        let Some(category) = product.category.as_deref() else {
            return Vec::new();
        };
        let query = Query::new()
            .filter(Condition::eq("category", category))
            .filter(Condition::eq("is_active", true))
            .filter(Condition::not_eq("id", product.id.as_str()))
            .order_by(OrderBy::desc("created_at"))
            .order_by(OrderBy::asc("id"))
            .limit(RELATED_LIMIT);
        match self.products.find(&query).await {
            Ok(related) => related,
            Err(e) => {
                tracing::warn!(error = %e, id = %product.id, "failed to fetch related products");
                Vec::new()
            }
        }
    }

    async fn ensure_slug_free(&self, slug: &str, except: Option<&str>) -> Result<(), CatalogError> {
        let mut query = Query::new().filter(Condition::eq("slug", slug));
        if let Some(id) = except {
            query = query.filter(Condition::not_eq("id", id));
        }
        let taken = self.products.count(&query).await.context("check slug")?;
        if taken > 0 {
            return Err(CatalogError::Conflict(SLUG_TAKEN.into()));
        }
        Ok(())
    }
}

/// A uniqueness clash that slipped past the pre-check still reads as a slug conflict.
fn slug_conflict(err: CatalogError) -> CatalogError {
    match err {
        CatalogError::Conflict(_) => CatalogError::Conflict(SLUG_TAKEN.into()),
        other => other,
    }
}
