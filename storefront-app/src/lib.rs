//! The storefront HTTP server.
//!
//! | Path prefix            | Audience                  |
//! |------------------------|---------------------------|
//! | `/api/products`        | shop listing, admin CRUD  |
//! | `/api/categories`      | shop filters              |
//! | `/api/shop/products`   | product page              |
//! | `/api/me`              | view selection            |
//! | `/api/checkout`        | order placement           |
//! | `/api/admin/...`       | dashboard and orders      |
//! | `/health`              | liveness and readiness    |

pub mod controllers;
pub mod state;

use axum::Router;
use storefront_core::{catch_panic_layer, default_cors, default_trace, HealthBuilder};
use storefront_data_sqlx::PoolHealth;
use tower_http::services::ServeDir;

pub use state::AppState;

use controllers::{
    account_controller, admin_controller, checkout_controller, order_controller,
    product_controller, shop_controller,
};

/// Every API route plus the health endpoints, with tracing, CORS and panic
/// recovery applied.
pub fn build_router(state: AppState) -> Router {
    let health = HealthBuilder::new()
        .check(PoolHealth::new(state.pool.clone()))
        .into_router();

    Router::new()
        .merge(product_controller::routes())
        .merge(shop_controller::routes())
        .merge(account_controller::routes())
        .merge(checkout_controller::routes())
        .merge(admin_controller::routes())
        .merge(order_controller::routes())
        .with_state(state)
        .merge(health)
        .layer(default_cors())
        .layer(default_trace())
        .layer(catch_panic_layer())
}

/// Serve stored uploads when their public URL is a path on this server.
pub fn with_uploads(router: Router, upload_dir: &str, public_base_url: &str) -> Router {
    let mount = public_base_url.trim_end_matches('/');
    if !mount.starts_with('/') || mount.is_empty() {
        return router;
    }
    router.nest_service(mount, ServeDir::new(upload_dir))
}
