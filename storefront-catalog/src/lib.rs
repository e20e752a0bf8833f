//! Product catalog for the storefront.
//!
//! * [`filter`] parses listing query strings into a [`FilterRequest`];
//! * [`query`] turns a request into the gateway's query description;
//! * [`service`] lists, creates, updates and deletes products;
//! * [`admin`] sequences dashboard actions and list refreshes;
//! * [`orders`] handles order management and checkout;
//! * [`media`] stores uploaded product images.

pub mod admin;
pub mod error;
pub mod filter;
pub mod media;
pub mod model;
pub mod orders;
pub mod payload;
pub mod query;
pub mod service;

pub use admin::{AdminConsole, AdminOutcome, ADMIN_PAGE_SIZE};
pub use error::CatalogError;
pub use filter::{FilterRequest, SortOption, Visibility};
pub use media::{BlobStore, LocalBlobStore, Upload};
pub use model::{Order, OrderItem, OrderStatus, Product, ShippingAddress};
pub use orders::{CheckoutLine, CheckoutRequest, OrderService, StatusUpdate};
pub use payload::{NumberInput, ProductFields, ProductInput};
pub use query::{PageLimits, ProductQuery, ProductQueryBuilder, Scope};
pub use service::CatalogService;

/// Schema for products, orders and order items.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub mod prelude {
    pub use crate::{
        AdminConsole, CatalogError, CatalogService, FilterRequest, OrderService, Product,
        ProductInput, ProductQueryBuilder, Scope,
    };
}
