use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::{Sqlite, SqlitePool};
use storefront_catalog::{
    AdminConsole, CatalogService, LocalBlobStore, Order, OrderItem, OrderService, PageLimits,
    Product, ProductQueryBuilder,
};
use storefront_core::StorefrontConfig;
use storefront_data_sqlx::SqlxRepository;
use storefront_security::JwtClaimsValidator;

pub type Products = SqlxRepository<Product, Sqlite>;
pub type OrderItems = SqlxRepository<OrderItem, Sqlite>;
pub type Orders = SqlxRepository<Order, Sqlite>;

pub type Catalog = CatalogService<Products, OrderItems>;
pub type Admin = AdminConsole<Products, OrderItems, LocalBlobStore>;
pub type Checkout = OrderService<Orders, OrderItems, Products>;

/// Everything a handler can reach. Cloned per request; the pool is the only
/// shared mutable resource.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub admin: Admin,
    pub orders: Checkout,
    pub jwt_validator: Arc<JwtClaimsValidator>,
    pub pool: SqlitePool,
    pub max_page_size: u64,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        config: &StorefrontConfig,
        jwt_validator: Arc<JwtClaimsValidator>,
    ) -> Self {
        let limits = PageLimits {
            default: config.catalog.default_page_size,
            max: config.catalog.max_page_size,
        };
        let products = Products::new(pool.clone());
        let order_items = OrderItems::new(pool.clone());
        let catalog = CatalogService::new(
            products.clone(),
            order_items.clone(),
            ProductQueryBuilder::new(limits),
        );
        let blobs = LocalBlobStore::new(&config.media.upload_dir, &config.media.public_base_url);
        Self {
            admin: AdminConsole::new(catalog.clone(), blobs),
            orders: OrderService::new(Orders::new(pool.clone()), order_items, products),
            catalog,
            jwt_validator,
            pool,
            max_page_size: limits.max,
        }
    }
}

impl FromRef<AppState> for Arc<JwtClaimsValidator> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_validator.clone()
    }
}
