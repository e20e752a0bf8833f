//! SQLx backend for the storefront data layer.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxRepository`] | `Repository` implementation over an `sqlx::Pool<Sqlite>` |
//! | [`connect_sqlite`] | Pool setup, including the single-connection in-memory case |
//! | [`PoolHealth`] | Health indicator for the `/health` endpoints |
//! | [`SqlxErrorExt`] | `sqlx::Error` to `DataError` (`.into_data_error()`) |
//! | [`codec`] | Column encodings used by entity `FromRow` implementations |
//!
//! Unique and foreign-key violations surface as `DataError::Conflict`; every
//! other driver error is wrapped as `DataError::Database`.

pub mod codec;
pub mod error;
pub mod pool;
pub mod repository;

pub use error::{SqlxErrorExt, SqlxResult};
pub use pool::{connect_sqlite, PoolHealth};
pub use repository::SqlxRepository;

pub mod prelude {
    pub use crate::{connect_sqlite, SqlxErrorExt, SqlxRepository};
    pub use storefront_data::prelude::*;
}
