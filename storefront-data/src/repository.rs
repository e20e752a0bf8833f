use crate::entity::Entity;
use crate::error::DataError;
use crate::query::Query;
use crate::value::Value;
use std::future::Future;

/// Generic async persistence gateway for one entity type.
///
/// Uses RPITIT (return-position `impl Trait` in traits), so no `async-trait` is needed.
///
/// `find` and `count` take the same [`Query`] so that a page and its total
/// are derived from one predicate. Two separate calls are made; a concurrent
/// write between them can make the total disagree with the page.
pub trait Repository<T: Entity>: Send + Sync {
    /// Rows matching the query's predicate, in its order, within its window.
    fn find(&self, query: &Query) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;

    /// Number of rows matching the query's predicate. Order and window are ignored.
    fn count(&self, query: &Query) -> impl Future<Output = Result<u64, DataError>> + Send;

    fn find_by_id(&self, id: &T::Id) -> impl Future<Output = Result<Option<T>, DataError>> + Send;

    /// Distinct non-null values of `column` among rows matching the query, ascending.
    fn distinct(
        &self,
        column: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Value>, DataError>> + Send;

    fn insert(&self, entity: &T) -> impl Future<Output = Result<T, DataError>> + Send;

    /// Overwrite the stored row with the same id. `DataError::NotFound` if absent.
    fn update(&self, entity: &T) -> impl Future<Output = Result<T, DataError>> + Send;

    /// Returns `false` when no row had that id.
    fn delete(&self, id: &T::Id) -> impl Future<Output = Result<bool, DataError>> + Send;
}
