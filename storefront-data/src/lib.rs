pub mod entity;
pub mod error;
pub mod memory;
pub mod page;
pub mod query;
pub mod repository;
pub mod value;

pub use entity::Entity;
pub use error::DataError;
pub use memory::MemoryRepository;
pub use page::{Page, Pageable, Pagination};
pub use query::{
    Condition, Dialect, Direction, Nulls, OrderBy, Query, QueryBuilder, QueryError, MAX_WINDOW,
};
pub use repository::Repository;
pub use value::Value;

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{Condition, Entity, OrderBy, Page, Pageable, Query, Repository, Value};
}
