use std::marker::PhantomData;

use sqlx::sqlite::SqliteRow;
use sqlx::{Database, FromRow, Pool, Sqlite};
use storefront_data::{
    Condition, DataError, Dialect, Entity, Query, QueryBuilder, Repository, Value,
};

use crate::codec;
use crate::error::SqlxErrorExt;

/// A [`Repository`] backed by an `sqlx::Pool<DB>`.
///
/// Statements are rendered by [`QueryBuilder`] from the entity's table and
/// column list, so the entity only has to provide `sqlx::FromRow`.
///
/// ```ignore
/// let repo = SqlxRepository::<Product, Sqlite>::new(pool.clone());
/// let page = repo.find(&query).await?;
/// ```
pub struct SqlxRepository<T, DB: Database> {
    pool: Pool<DB>,
    _marker: PhantomData<T>,
}

impl<T, DB: Database> SqlxRepository<T, DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }
}

impl<T, DB: Database> Clone for SqlxRepository<T, DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Entity> SqlxRepository<T, Sqlite> {
    /// A `QueryBuilder` pre-configured for this entity's table.
    pub fn builder(&self) -> QueryBuilder {
        QueryBuilder::new(T::table_name()).dialect(Dialect::Sqlite)
    }

    /// Ids travel as text; SQLite's column affinity handles integer keys.
    fn id_value(id: &T::Id) -> Value {
        Value::Text(id.to_string())
    }
}

impl<T> Repository<T> for SqlxRepository<T, Sqlite>
where
    T: Entity + for<'r> FromRow<'r, SqliteRow>,
{
    async fn find(&self, query: &Query) -> Result<Vec<T>, DataError> {
        let (sql, params) = self.builder().query(query).build_select(T::columns())?;
        tracing::debug!(table = T::table_name(), %sql, "find");
        sqlx::query_as_with::<_, T, _>(&sql, codec::arguments(params)?)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn count(&self, query: &Query) -> Result<u64, DataError> {
        let (sql, params) = self.builder().query(query).build_count()?;
        tracing::debug!(table = T::table_name(), %sql, "count");
        let total: i64 = sqlx::query_scalar_with::<_, i64, _>(&sql, codec::arguments(params)?)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, DataError> {
        let query = Query::new()
            .filter(Condition::Eq(T::id_column().to_string(), Self::id_value(id)))
            .limit(1);
        Ok(self.find(&query).await?.into_iter().next())
    }

    async fn distinct(&self, column: &str, query: &Query) -> Result<Vec<Value>, DataError> {
        let query = query.unwindowed().filter(Condition::is_not_null(column));
        let (sql, params) = self.builder().query(&query).build_distinct(column)?;
        tracing::debug!(table = T::table_name(), %sql, "distinct");
        let rows = sqlx::query_with(&sql, codec::arguments(params)?)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        rows.iter().map(codec::first_column).collect()
    }

    async fn insert(&self, entity: &T) -> Result<T, DataError> {
        let sql = self.builder().build_insert(T::columns())?;
        let params = entity.values().into_iter().map(|(_, v)| v).collect();
        sqlx::query_with(&sql, codec::arguments(params)?)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        tracing::debug!(table = T::table_name(), id = %entity.id().to_string(), "inserted");
        Ok(entity.clone())
    }

    async fn update(&self, entity: &T) -> Result<T, DataError> {
        let id_column = T::id_column();
        let columns: Vec<&str> = T::columns()
            .iter()
            .copied()
            .filter(|c| *c != id_column)
            .collect();
        let sql = self.builder().build_update(&columns, id_column)?;
        let mut params: Vec<Value> = columns.iter().map(|c| entity.value(c)).collect();
        params.push(Self::id_value(entity.id()));
        let result = sqlx::query_with(&sql, codec::arguments(params)?)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        if result.rows_affected() == 0 {
            return Err(DataError::NotFound(format!(
                "{} {} not found",
                T::table_name(),
                entity.id().to_string()
            )));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: &T::Id) -> Result<bool, DataError> {
        let sql = self.builder().build_delete(T::id_column())?;
        let result = sqlx::query_with(&sql, codec::arguments(vec![Self::id_value(id)])?)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        Ok(result.rows_affected() > 0)
    }
}
