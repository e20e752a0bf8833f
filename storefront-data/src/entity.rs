use crate::value::Value;

/// Trait representing a persisted record with a table name, id column and column list.
///
/// `value` exposes each column as a [`Value`] so that every backend can read
/// the record the same way: the SQL repository binds the values on insert and
/// update, the in-memory repository evaluates predicates against them.
///
/// # Example
///
/// ```ignore
/// impl Entity for OrderItem {
///     type Id = String;
///     fn table_name() -> &'static str { "order_items" }
///     fn id_column() -> &'static str { "id" }
///     fn columns() -> &'static [&'static str] { &["id", "order_id", "product_id", "quantity"] }
///     fn id(&self) -> &String { &self.id }
///     fn value(&self, column: &str) -> Value {
///         match column {
///             "id" => self.id.clone().into(),
///             "order_id" => self.order_id.clone().into(),
///             "product_id" => self.product_id.clone().into(),
///             "quantity" => self.quantity.into(),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    type Id: Clone + PartialEq + Send + Sync + ToString + 'static;

    fn table_name() -> &'static str;
    fn id_column() -> &'static str;
    fn columns() -> &'static [&'static str];
    fn id(&self) -> &Self::Id;

    /// Read a single column. Unknown columns read as [`Value::Null`].
    fn value(&self, column: &str) -> Value;

    /// Every column paired with its current value, in [`Entity::columns`] order.
    fn values(&self) -> Vec<(&'static str, Value)> {
        Self::columns()
            .iter()
            .map(|col| (*col, self.value(col)))
            .collect()
    }
}
