//! In-process repository that evaluates [`Query`] descriptions directly.
//!
//! Used by tests and by the catalog when no database is configured. It
//! follows SQLite's semantics closely enough that a service behaves the
//! same against either backend: comparisons with `NULL` are false, `NULL`
//! sorts as the smallest value unless the ordering says otherwise, and
//! unique columns reject duplicates with [`DataError::Conflict`].

use std::cmp::Ordering;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::entity::Entity;
use crate::error::DataError;
use crate::query::{Condition, Direction, Nulls, OrderBy, Query};
use crate::repository::Repository;
use crate::value::Value;

pub struct MemoryRepository<T> {
    rows: Arc<RwLock<Vec<T>>>,
    unique: &'static [&'static str],
}

impl<T> Clone for MemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            unique: self.unique,
        }
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            unique: &[],
        }
    }

    /// Enforce uniqueness of the given columns on insert and update.
    pub fn with_unique(mut self, columns: &'static [&'static str]) -> Self {
        self.unique = columns;
        self
    }

    fn check_unique(&self, rows: &[T], entity: &T) -> Result<(), DataError> {
        for col in self.unique {
            let candidate = entity.value(col);
            if candidate.is_null() {
                continue;
            }
            let clash = rows
                .iter()
                .any(|row| row.id() != entity.id() && row.value(col) == candidate);
            if clash {
                return Err(DataError::Conflict(format!(
                    "{}.{col} must be unique",
                    T::table_name()
                )));
            }
        }
        Ok(())
    }
}

/// Evaluate a condition against a record.
pub fn matches<T: Entity>(cond: &Condition, record: &T) -> bool {
    match cond {
        Condition::Eq(col, val) => record.value(col).compare(val) == Some(Ordering::Equal),
        Condition::NotEq(col, val) => matches!(
            record.value(col).compare(val),
            Some(Ordering::Less | Ordering::Greater)
        ),
        Condition::Gte(col, val) => matches!(
            record.value(col).compare(val),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Condition::Lte(col, val) => matches!(
            record.value(col).compare(val),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Condition::Contains(col, needle) => match record.value(col) {
            Value::Text(text) => text.to_lowercase().contains(&needle.to_lowercase()),
            _ => false,
        },
        Condition::HasElement(col, element) => match record.value(col) {
            Value::List(items) => items.iter().any(|item| item == element),
            _ => false,
        },
        Condition::IsNull(col) => record.value(col).is_null(),
        Condition::IsNotNull(col) => !record.value(col).is_null(),
        Condition::All(group) => group.iter().all(|c| matches(c, record)),
        Condition::Any(group) => group.iter().any(|c| matches(c, record)),
    }
}

/// Compare two records under an ordering list.
pub fn compare<T: Entity>(order: &[OrderBy], a: &T, b: &T) -> Ordering {
    for o in order {
        let (va, vb) = (a.value(&o.column), b.value(&o.column));
        let ord = match (va.is_null(), vb.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) | (false, true) => {
                // `a_null_first` is whether a NULL `a` goes before a non-null `b`.
                let a_null_first = match o.nulls {
                    Nulls::First => true,
                    Nulls::Last => false,
                    Nulls::Default => o.direction == Direction::Asc,
                };
                let null_side = if a_null_first {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
                if va.is_null() {
                    null_side
                } else {
                    null_side.reverse()
                }
            }
            (false, false) => {
                let natural = va.compare(&vb).unwrap_or(Ordering::Equal);
                match o.direction {
                    Direction::Asc => natural,
                    Direction::Desc => natural.reverse(),
                }
            }
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn select<T: Entity>(rows: &[T], query: &Query) -> Vec<T> {
    rows.iter()
        .filter(|row| query.conditions().iter().all(|c| matches(c, *row)))
        .cloned()
        .collect()
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn find(&self, query: &Query) -> Result<Vec<T>, DataError> {
        let rows = self.rows.read().await;
        let mut selected = select(&rows, query);
        selected.sort_by(|a, b| compare(query.ordering(), a, b));
        let offset = usize::try_from(query.window_offset()).unwrap_or(usize::MAX);
        let limit = query
            .window_limit()
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        Ok(selected.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, query: &Query) -> Result<u64, DataError> {
        let rows = self.rows.read().await;
        Ok(select(&rows, query).len() as u64)
    }

    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, DataError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn distinct(&self, column: &str, query: &Query) -> Result<Vec<Value>, DataError> {
        let rows = self.rows.read().await;
        let mut values: Vec<Value> = Vec::new();
        for row in select(&rows, query) {
            let v = row.value(column);
            if !v.is_null() && !values.contains(&v) {
                values.push(v);
            }
        }
        values.sort_by(|a, b| a.compare(b).unwrap_or(Ordering::Equal));
        Ok(values)
    }

    async fn insert(&self, entity: &T) -> Result<T, DataError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id() == entity.id()) {
            return Err(DataError::Conflict(format!(
                "{} {} already exists",
                T::table_name(),
                entity.id().to_string()
            )));
        }
        self.check_unique(&rows, entity)?;
        rows.push(entity.clone());
        Ok(entity.clone())
    }

    async fn update(&self, entity: &T) -> Result<T, DataError> {
        let mut rows = self.rows.write().await;
        self.check_unique(&rows, entity)?;
        let slot = rows
            .iter_mut()
            .find(|row| row.id() == entity.id())
            .ok_or_else(|| {
                DataError::NotFound(format!(
                    "{} {} not found",
                    T::table_name(),
                    entity.id().to_string()
                ))
            })?;
        *slot = entity.clone();
        Ok(entity.clone())
    }

    async fn delete(&self, id: &T::Id) -> Result<bool, DataError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok(rows.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: String,
        code: String,
        score: Option<i64>,
        labels: Vec<String>,
    }

    impl Entity for Item {
        type Id = String;
        fn table_name() -> &'static str {
            "items"
        }
        fn id_column() -> &'static str {
            "id"
        }
        fn columns() -> &'static [&'static str] {
            &["id", "code", "score", "labels"]
        }
        fn id(&self) -> &String {
            &self.id
        }
        fn value(&self, column: &str) -> Value {
            match column {
                "id" => self.id.clone().into(),
                "code" => self.code.clone().into(),
                "score" => self.score.into(),
                "labels" => self.labels.clone().into(),
                _ => Value::Null,
            }
        }
    }

    fn item(id: &str, score: Option<i64>, labels: &[&str]) -> Item {
        Item {
            id: id.into(),
            code: format!("code-{id}"),
            score,
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    async fn seeded() -> MemoryRepository<Item> {
        let repo = MemoryRepository::new().with_unique(&["code"]);
        for it in [
            item("a", Some(3), &["x"]),
            item("b", None, &[]),
            item("c", Some(1), &["x", "y"]),
        ] {
            repo.insert(&it).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn nulls_last_puts_missing_scores_at_the_end() {
        let repo = seeded().await;
        let q = Query::new().order_by(OrderBy::asc("score").nulls_last());
        let ids: Vec<_> = repo.find(&q).await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        let q = Query::new().order_by(OrderBy::desc("score").nulls_last());
        let ids: Vec<_> = repo.find(&q).await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn comparisons_with_null_are_false() {
        let repo = seeded().await;
        let q = Query::new().filter(Condition::gte("score", 0i64));
        assert_eq!(repo.count(&q).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn window_applies_after_ordering() {
        let repo = seeded().await;
        let q = Query::new().order_by(OrderBy::asc("id")).offset(1).limit(1);
        let rows = repo.find(&q).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "b");
        assert_eq!(repo.count(&q).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn has_element_checks_list_membership() {
        let repo = seeded().await;
        let q = Query::new().filter(Condition::has_element("labels", "y"));
        assert_eq!(repo.count(&q).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unique_columns_conflict() {
        let repo = seeded().await;
        let mut dup = item("d", None, &[]);
        dup.code = "code-a".into();
        let err = repo.insert(&dup).await.unwrap_err();
        assert!(matches!(err, DataError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let repo = seeded().await;
        let err = repo.update(&item("zzz", None, &[])).await.unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn distinct_skips_nulls() {
        let repo = seeded().await;
        let values = repo.distinct("score", &Query::new()).await.unwrap();
        assert_eq!(values, vec![Value::Int(1), Value::Int(3)]);
    }
}
