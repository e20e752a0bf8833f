use crate::value::Value;

/// A single predicate over named columns.
///
/// Conditions nest through [`Condition::All`] and [`Condition::Any`], which is
/// how OR-groups such as "regular price in range OR sale price in range" are
/// expressed. SQL backends render them with [`QueryBuilder`]; the in-memory
/// repository evaluates them directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    NotEq(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    /// Case-insensitive substring match on a text column.
    Contains(String, String),
    /// The list column holds exactly this element.
    HasElement(String, String),
    IsNull(String),
    IsNotNull(String),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Condition::Eq(column.to_string(), value.into())
    }

    pub fn not_eq(column: &str, value: impl Into<Value>) -> Self {
        Condition::NotEq(column.to_string(), value.into())
    }

    pub fn gte(column: &str, value: impl Into<Value>) -> Self {
        Condition::Gte(column.to_string(), value.into())
    }

    pub fn lte(column: &str, value: impl Into<Value>) -> Self {
        Condition::Lte(column.to_string(), value.into())
    }

    /// Case-insensitive substring match. SQL backends fold case with
    /// `LOWER()`, which SQLite applies to ASCII only; match non-ASCII text
    /// against a column that already holds lowercased text.
    pub fn contains(column: &str, needle: &str) -> Self {
        Condition::Contains(column.to_string(), needle.to_string())
    }

    pub fn has_element(column: &str, element: &str) -> Self {
        Condition::HasElement(column.to_string(), element.to_string())
    }

    pub fn is_null(column: &str) -> Self {
        Condition::IsNull(column.to_string())
    }

    pub fn is_not_null(column: &str) -> Self {
        Condition::IsNotNull(column.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Placement of `NULL` values in an ordering.
///
/// `Default` leaves it to the backend (SQLite and the in-memory repository
/// both treat `NULL` as the smallest value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nulls {
    #[default]
    Default,
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
    pub nulls: Nulls,
}

impl OrderBy {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: Direction::Asc,
            nulls: Nulls::Default,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: Direction::Desc,
            nulls: Nulls::Default,
        }
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Nulls::Last;
        self
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Nulls::First;
        self
    }
}

/// Largest offset or limit a window can carry. SQL engines read these as
/// signed 64-bit integers.
pub const MAX_WINDOW: u64 = i64::MAX as u64;

/// Immutable description of a read against one table.
///
/// Carries the resolved predicate (conditions joined with AND), the resolved
/// order and the offset/limit window. A count uses the same predicate and
/// ignores the order and the window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    filter: Vec<Condition>,
    order: Vec<OrderBy>,
    offset: u64,
    limit: Option<u64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter.push(condition);
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    /// Clamped to [`MAX_WINDOW`].
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset.min(MAX_WINDOW);
        self
    }

    /// Clamped to [`MAX_WINDOW`].
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit.min(MAX_WINDOW));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.filter
    }

    pub fn ordering(&self) -> &[OrderBy] {
        &self.order
    }

    pub fn window_offset(&self) -> u64 {
        self.offset
    }

    pub fn window_limit(&self) -> Option<u64> {
        self.limit
    }

    /// The same predicate without order or window, for counting.
    pub fn unwindowed(&self) -> Query {
        Query {
            filter: self.filter.clone(),
            ..Query::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Dialect {
    /// SQLite-style `?` placeholders, JSON arrays for list columns.
    Sqlite,
    /// Postgres-style `$1, $2, ...` placeholders, native arrays for list columns.
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum IdentifierPolicy {
    /// Validate identifiers against a conservative pattern.
    Validate,
    /// Validate and quote identifiers.
    Quote,
}

/// Renders a [`Query`] (or a write) into SQL text plus bind values.
///
/// Identifiers are always validated, so a table or column name can never
/// smuggle SQL into the statement; values only ever travel as parameters.
///
/// # Example
///
/// ```ignore
/// let query = Query::new()
///     .filter(Condition::eq("is_active", true))
///     .order_by(OrderBy::desc("created_at"))
///     .limit(12);
/// let (sql, params) = QueryBuilder::new("products")
///     .query(&query)
///     .build_select(&["id", "name"])?;
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    query: Query,
    dialect: Dialect,
    identifier_policy: IdentifierPolicy,
}

struct Render<'a> {
    builder: &'a QueryBuilder,
    sql: String,
    params: Vec<Value>,
}

impl Render<'_> {
    fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        self.builder.dialect.placeholder(self.params.len())
    }
}

impl QueryBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            query: Query::default(),
            dialect: Dialect::Sqlite,
            identifier_policy: IdentifierPolicy::Validate,
        }
    }

    /// Set the SQL dialect (affects placeholder style and list membership).
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Configure identifier quoting.
    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    /// Use the filter, order and window of an existing query description.
    pub fn query(mut self, query: &Query) -> Self {
        self.query = query.clone();
        self
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.query = self.query.filter(Condition::eq(column, value));
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.query = self.query.order_by(order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query = self.query.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.query = self.query.offset(offset);
        self
    }

    /// Build a SELECT query returning `(sql, bind_values)`.
    pub fn build_select(&self, columns: &[&str]) -> Result<(String, Vec<Value>), QueryError> {
        let table = self.ident(&self.table, "table")?;
        let columns = self.column_list(columns)?;
        let mut render = self.render(format!("SELECT {columns} FROM {table}"));
        self.append_where(&mut render)?;
        self.append_order(&mut render)?;
        self.append_window(&mut render);
        Ok((render.sql, render.params))
    }

    /// Build a COUNT query returning `(sql, bind_values)`. Order and window are ignored.
    pub fn build_count(&self) -> Result<(String, Vec<Value>), QueryError> {
        let table = self.ident(&self.table, "table")?;
        let mut render = self.render(format!("SELECT COUNT(*) FROM {table}"));
        self.append_where(&mut render)?;
        Ok((render.sql, render.params))
    }

    /// Build a `SELECT DISTINCT column` over the filtered rows, ascending.
    pub fn build_distinct(&self, column: &str) -> Result<(String, Vec<Value>), QueryError> {
        let table = self.ident(&self.table, "table")?;
        let column = self.ident(column, "column")?;
        let mut render = self.render(format!("SELECT DISTINCT {column} FROM {table}"));
        self.append_where(&mut render)?;
        render.sql.push_str(&format!(" ORDER BY {column} ASC"));
        Ok((render.sql, render.params))
    }

    /// Build an INSERT for `columns`; values are bound in the same order.
    pub fn build_insert(&self, columns: &[&str]) -> Result<String, QueryError> {
        let table = self.ident(&self.table, "table")?;
        let cols = self.column_list(columns)?;
        let placeholders: Vec<_> = (1..=columns.len())
            .map(|i| self.dialect.placeholder(i))
            .collect();
        Ok(format!(
            "INSERT INTO {table} ({cols}) VALUES ({})",
            placeholders.join(", ")
        ))
    }

    /// Build an UPDATE setting `columns`, keyed on `id_column`.
    ///
    /// Values are bound in column order, followed by the id.
    pub fn build_update(&self, columns: &[&str], id_column: &str) -> Result<String, QueryError> {
        let table = self.ident(&self.table, "table")?;
        let mut sets = Vec::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            let col = self.ident(col, "column")?;
            sets.push(format!("{col} = {}", self.dialect.placeholder(i + 1)));
        }
        let id = self.ident(id_column, "column")?;
        Ok(format!(
            "UPDATE {table} SET {} WHERE {id} = {}",
            sets.join(", "),
            self.dialect.placeholder(columns.len() + 1)
        ))
    }

    /// Build a DELETE keyed on `id_column`.
    pub fn build_delete(&self, id_column: &str) -> Result<String, QueryError> {
        let table = self.ident(&self.table, "table")?;
        let id = self.ident(id_column, "column")?;
        Ok(format!(
            "DELETE FROM {table} WHERE {id} = {}",
            self.dialect.placeholder(1)
        ))
    }

    fn render(&self, sql: String) -> Render<'_> {
        Render {
            builder: self,
            sql,
            params: Vec::new(),
        }
    }

    fn append_where(&self, render: &mut Render<'_>) -> Result<(), QueryError> {
        let conditions = self.query.conditions();
        if conditions.is_empty() {
            return Ok(());
        }
        let mut clauses = Vec::with_capacity(conditions.len());
        for cond in conditions {
            clauses.push(self.condition_sql(cond, render)?);
        }
        render.sql.push_str(" WHERE ");
        render.sql.push_str(&clauses.join(" AND "));
        Ok(())
    }

    fn condition_sql(&self, cond: &Condition, render: &mut Render<'_>) -> Result<String, QueryError> {
        let sql = match cond {
            Condition::Eq(col, val) => {
                let col = self.ident(col, "column")?;
                format!("{col} = {}", render.bind(val.clone()))
            }
            Condition::NotEq(col, val) => {
                let col = self.ident(col, "column")?;
                format!("{col} != {}", render.bind(val.clone()))
            }
            Condition::Gte(col, val) => {
                let col = self.ident(col, "column")?;
                format!("{col} >= {}", render.bind(val.clone()))
            }
            Condition::Lte(col, val) => {
                let col = self.ident(col, "column")?;
                format!("{col} <= {}", render.bind(val.clone()))
            }
            Condition::Contains(col, needle) => {
                let col = self.ident(col, "column")?;
                let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
                format!(
                    "LOWER({col}) LIKE {} ESCAPE '\\'",
                    render.bind(Value::Text(pattern))
                )
            }
            Condition::HasElement(col, element) => {
                let col = self.ident(col, "column")?;
                let placeholder = render.bind(Value::Text(element.clone()));
                match self.dialect {
                    Dialect::Sqlite => format!(
                        "EXISTS (SELECT 1 FROM json_each({col}) WHERE json_each.value = {placeholder})"
                    ),
                    Dialect::Postgres => format!("{placeholder} = ANY({col})"),
                }
            }
            Condition::IsNull(col) => {
                let col = self.ident(col, "column")?;
                format!("{col} IS NULL")
            }
            Condition::IsNotNull(col) => {
                let col = self.ident(col, "column")?;
                format!("{col} IS NOT NULL")
            }
            Condition::All(group) => self.group_sql(group, " AND ", "1 = 1", render)?,
            Condition::Any(group) => self.group_sql(group, " OR ", "1 = 0", render)?,
        };
        Ok(sql)
    }

    fn group_sql(
        &self,
        group: &[Condition],
        joiner: &str,
        empty: &str,
        render: &mut Render<'_>,
    ) -> Result<String, QueryError> {
        if group.is_empty() {
            return Ok(empty.to_string());
        }
        let mut parts = Vec::with_capacity(group.len());
        for cond in group {
            parts.push(self.condition_sql(cond, render)?);
        }
        Ok(format!("({})", parts.join(joiner)))
    }

    fn append_order(&self, render: &mut Render<'_>) -> Result<(), QueryError> {
        let order = self.query.ordering();
        if order.is_empty() {
            return Ok(());
        }
        let mut clauses = Vec::with_capacity(order.len());
        for o in order {
            let col = self.ident(&o.column, "column")?;
            let dir = match o.direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            let nulls = match o.nulls {
                Nulls::Default => "",
                Nulls::First => " NULLS FIRST",
                Nulls::Last => " NULLS LAST",
            };
            clauses.push(format!("{col} {dir}{nulls}"));
        }
        render.sql.push_str(" ORDER BY ");
        render.sql.push_str(&clauses.join(", "));
        Ok(())
    }

    fn append_window(&self, render: &mut Render<'_>) {
        let offset = self.query.window_offset();
        match self.query.window_limit() {
            Some(limit) => render.sql.push_str(&format!(" LIMIT {limit}")),
            // SQLite only accepts OFFSET after a LIMIT.
            None if offset > 0 && matches!(self.dialect, Dialect::Sqlite) => {
                render.sql.push_str(" LIMIT -1")
            }
            None => {}
        }
        if offset > 0 {
            render.sql.push_str(&format!(" OFFSET {offset}"));
        }
    }

    fn column_list(&self, columns: &[&str]) -> Result<String, QueryError> {
        let mut out = Vec::with_capacity(columns.len());
        for col in columns {
            out.push(self.ident(col, "column")?);
        }
        Ok(out.join(", "))
    }

    fn ident(&self, ident: &str, kind: &'static str) -> Result<String, QueryError> {
        if !is_valid_identifier(ident) {
            return Err(QueryError::InvalidIdentifier {
                kind,
                ident: ident.to_string(),
            });
        }
        match self.identifier_policy {
            IdentifierPolicy::Quote => Ok(quote_identifier(ident)),
            IdentifierPolicy::Validate => Ok(ident.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum QueryError {
    InvalidIdentifier { kind: &'static str, ident: String },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl From<QueryError> for crate::DataError {
    fn from(err: QueryError) -> Self {
        crate::DataError::Other(err.to_string())
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn is_valid_identifier(ident: &str) -> bool {
    !ident.is_empty() && ident.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_identifier(ident: &str) -> String {
    ident
        .split('.')
        .map(|part| format!("\"{part}\""))
        .collect::<Vec<_>>()
        .join(".")
}
