//! Fluent query façade.
//!
//! A `QueryExecutor` accumulates clauses by value and is consumed by one
//! terminal operation:
//!
//! | Terminal | SQL change | Empty result |
//! |----------|------------|--------------|
//! | `all` | none | empty `Records` |
//! | `first` | `LIMIT 1` | `NoRows` |
//! | `last` | `ORDER BY <pk> DESC` if unordered, `LIMIT 1` | `NoRows` |
//! | `count` | `COUNT(*)`, no ORDER/LIMIT/OFFSET | `0` |
//! | `exists` | as `count` | `false` |
//! | `find_by_id` | `<pk> = ?`, `LIMIT 1` | `NoRows` |

use std::marker::PhantomData;

use tracing::debug;

use super::helpers::placeholder_group;
use super::{CompiledQuery, Direction, OrderClause, Query, QueryError, WhereClause, IN_OPERATOR};
use crate::db::{DatabaseValue, ExecContext, Executor, FromRow, QueryResult, Value};
use crate::drivers::{Driver, DriverImpl};

/// Primary key assumed when the table's model is unknown.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Single-use builder for one query against one table.
pub struct QueryExecutor<'a, T> {
    driver: DriverImpl,
    executor: Option<&'a dyn Executor>,
    query: Query,
    primary_key: String,
    _row: PhantomData<fn() -> T>,
}

impl<'a, T: FromRow> QueryExecutor<'a, T> {
    pub fn new(driver: DriverImpl, executor: Option<&'a dyn Executor>, table: &str) -> Self {
        Self {
            driver,
            executor,
            query: Query::new(table),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            _row: PhantomData,
        }
    }

    /// Column used by `last` and `find_by_id`.
    pub fn with_primary_key(mut self, field: &str) -> Self {
        self.primary_key = field.to_string();
        self
    }

    /// Project only these columns.
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.query.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Add `<field> <op> ?`.
    pub fn where_(mut self, field: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.query
            .wheres
            .push(WhereClause::new(field, operator, value));
        self
    }

    /// Add `<field> NOT <op> ?`.
    pub fn where_not(mut self, field: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.query
            .wheres
            .push(WhereClause::new(field, operator, value).negate());
        self
    }

    /// Add `<field> IN (?,?,...)` with one marker per value.
    ///
    /// The marker group is written into the SQL as-is. The values themselves
    /// are not bound.
    pub fn where_in<V: Into<Value>>(mut self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let count = values.into_iter().count();
        self.query
            .wheres
            .push(WhereClause::new(field, IN_OPERATOR, placeholder_group(count)));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.query.orders.push(OrderClause::new(field, direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Mark relations for eager loading. Recorded on the query only.
    pub fn include(mut self, relations: &[&str]) -> Self {
        self.query
            .includes
            .extend(relations.iter().map(|r| r.to_string()));
        self
    }

    /// The query accumulated so far.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Compile without executing.
    pub fn compile(&self) -> CompiledQuery {
        self.driver.build_query(&self.query)
    }

    /// Fetch every matching row. Rows are decoded as the iterator advances.
    pub fn all(self, ctx: &ExecContext) -> Result<Records<T>, QueryError> {
        let result = self.fetch(ctx, &self.query)?;
        Ok(Records::new(self.query.table, result))
    }

    /// Fetch the first matching row.
    pub fn first(mut self, ctx: &ExecContext) -> Result<T, QueryError> {
        self.query.limit = Some(1);
        let result = self.fetch(ctx, &self.query)?;
        Records::<T>::new(self.query.table.clone(), result)
            .next()
            .unwrap_or(Err(QueryError::NoRows {
                table: self.query.table,
            }))
    }

    /// Fetch the last row, ordering by primary key descending unless an
    /// ordering was already given.
    pub fn last(mut self, ctx: &ExecContext) -> Result<T, QueryError> {
        if self.query.orders.is_empty() {
            let pk = self.primary_key.clone();
            self.query.orders.push(OrderClause::new(pk, Direction::Desc));
        }
        self.first(ctx)
    }

    /// Fetch the row whose primary key equals `id`.
    pub fn find_by_id(self, ctx: &ExecContext, id: impl Into<Value>) -> Result<T, QueryError> {
        let pk = self.primary_key.clone();
        self.where_(&pk, "=", id).first(ctx)
    }

    /// Number of matching rows.
    pub fn count(self, ctx: &ExecContext) -> Result<i64, QueryError> {
        let count_query = self.query.to_count();
        let result = self.fetch(ctx, &count_query)?;
        let value = result
            .rows
            .first()
            .and_then(|row| row.first())
            .unwrap_or(&Value::Null);

        value.as_i64().ok_or_else(|| QueryError::Decode {
            table: self.query.table.clone(),
            source: format!("COUNT(*) returned {} value", value.type_name()).into(),
        })
    }

    /// Whether any row matches.
    pub fn exists(self, ctx: &ExecContext) -> Result<bool, QueryError> {
        Ok(self.count(ctx)? > 0)
    }

    fn fetch(&self, ctx: &ExecContext, query: &Query) -> Result<QueryResult, QueryError> {
        let executor = self.executor.ok_or(QueryError::NotInitialized)?;
        let compiled = self.driver.build_query(query);
        debug!(table = %query.table, sql = %compiled.sql, "executing query");

        executor
            .query(ctx, &compiled.sql, &compiled.args)
            .map_err(|source| QueryError::Execution {
                table: query.table.clone(),
                source,
            })
    }
}

/// Lazily decoded result rows.
pub struct Records<T> {
    table: String,
    result: QueryResult,
    next: usize,
    _row: PhantomData<fn() -> T>,
}

impl<T: FromRow> Records<T> {
    fn new(table: String, result: QueryResult) -> Self {
        Self {
            table,
            result,
            next: 0,
            _row: PhantomData,
        }
    }

    /// Rows not yet decoded.
    pub fn remaining(&self) -> usize {
        self.result.len() - self.next
    }
}

impl<T: FromRow> Iterator for Records<T> {
    type Item = Result<T, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.result.row(self.next)?;
        self.next += 1;
        Some(T::from_row(&row).map_err(|source| QueryError::Decode {
            table: self.table.clone(),
            source,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{BoxError, Row};
    use crate::dialect::Dialect;
    use crate::test_utils::RecordingExecutor;
    use rstest::{fixture, rstest};

    #[derive(Debug, PartialEq)]
    struct User {
        id: i64,
        email: String,
    }

    impl FromRow for User {
        fn from_row(row: &Row<'_>) -> Result<Self, BoxError> {
            Ok(User {
                id: row.get_i64("id")?,
                email: row.get_string("email")?,
            })
        }
    }

    fn user_row(id: i64, email: &str) -> Vec<Value> {
        vec![Value::Int(id), Value::from(email)]
    }

    #[fixture]
    fn two_users() -> RecordingExecutor {
        RecordingExecutor::new().with_rows(
            &["id", "email"],
            vec![user_row(1, "a@x.io"), user_row(2, "b@x.io")],
        )
    }

    fn users<'a>(dialect: Dialect, executor: &'a RecordingExecutor) -> QueryExecutor<'a, User> {
        QueryExecutor::new(dialect.driver(), Some(executor as &dyn Executor), "users")
    }

    #[rstest]
    fn test_all_decodes_every_row(two_users: RecordingExecutor) {
        let ctx = ExecContext::new();
        let records = users(Dialect::Sqlite, &two_users)
            .where_("age", ">", 18)
            .all(&ctx)
            .unwrap();
        assert_eq!(records.remaining(), 2);

        let users: Vec<User> = records.collect::<Result<_, _>>().unwrap();
        assert_eq!(users[1], User { id: 2, email: "b@x.io".to_string() });

        let calls = two_users.calls();
        assert_eq!(calls[0].sql, "SELECT * FROM users WHERE age > ?");
        assert_eq!(calls[0].args, vec![Value::Int(18)]);
    }

    #[rstest]
    fn test_all_empty_is_not_an_error() {
        let executor = RecordingExecutor::new();
        let records = users(Dialect::Sqlite, &executor).all(&ExecContext::new()).unwrap();
        assert_eq!(records.count(), 0);
    }

    #[rstest]
    fn test_first_injects_limit(two_users: RecordingExecutor) {
        let user = users(Dialect::Postgres, &two_users)
            .where_("email", "=", "a@x.io")
            .first(&ExecContext::new())
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(
            two_users.statements(),
            vec!["SELECT * FROM users WHERE email = $1 LIMIT 1".to_string()]
        );
    }

    #[rstest]
    fn test_first_on_empty_result_is_no_rows() {
        let executor = RecordingExecutor::new();
        let err = users(Dialect::Sqlite, &executor)
            .where_("age", ">", 200)
            .first(&ExecContext::new())
            .unwrap_err();
        assert!(err.is_no_rows());
        assert!(matches!(err, QueryError::NoRows { ref table } if table == "users"));
    }

    #[rstest]
    fn test_last_defaults_to_primary_key_descending(two_users: RecordingExecutor) {
        let _ = users(Dialect::Mysql, &two_users).last(&ExecContext::new()).unwrap();
        assert_eq!(
            two_users.statements(),
            vec!["SELECT * FROM users ORDER BY id DESC LIMIT 1".to_string()]
        );
    }

    #[rstest]
    fn test_last_keeps_explicit_ordering(two_users: RecordingExecutor) {
        let _ = users(Dialect::Mysql, &two_users)
            .order_by("email", Direction::Asc)
            .last(&ExecContext::new())
            .unwrap();
        assert_eq!(
            two_users.statements(),
            vec!["SELECT * FROM users ORDER BY email ASC LIMIT 1".to_string()]
        );
    }

    #[rstest]
    fn test_find_by_id_uses_primary_key(two_users: RecordingExecutor) {
        let user = users(Dialect::Postgres, &two_users)
            .with_primary_key("user_id")
            .find_by_id(&ExecContext::new(), 1)
            .unwrap();
        assert_eq!(user.email, "a@x.io");
        let calls = two_users.calls();
        assert_eq!(calls[0].sql, "SELECT * FROM users WHERE user_id = $1 LIMIT 1");
        assert_eq!(calls[0].args, vec![Value::Int(1)]);
    }

    #[rstest]
    fn test_count_drops_order_and_paging() {
        let executor = RecordingExecutor::new().with_rows(&["COUNT(*)"], vec![vec![Value::Int(7)]]);
        let count = users(Dialect::Postgres, &executor)
            .where_("age", ">", 18)
            .order_by("id", Direction::Desc)
            .limit(5)
            .offset(10)
            .count(&ExecContext::new())
            .unwrap();
        assert_eq!(count, 7);
        assert_eq!(
            executor.statements(),
            vec!["SELECT COUNT(*) FROM users WHERE age > $1".to_string()]
        );
    }

    #[rstest]
    fn test_count_rejects_non_integer() {
        let executor = RecordingExecutor::new().with_rows(&["COUNT(*)"], vec![vec![Value::from("x")]]);
        let err = users(Dialect::Sqlite, &executor)
            .count(&ExecContext::new())
            .unwrap_err();
        assert!(matches!(err, QueryError::Decode { .. }));
    }

    #[rstest]
    #[case(0, false)]
    #[case(3, true)]
    fn test_exists(#[case] count: i64, #[case] expected: bool) {
        let executor = RecordingExecutor::new().with_rows(&["COUNT(*)"], vec![vec![Value::Int(count)]]);
        let exists = users(Dialect::Sqlite, &executor)
            .exists(&ExecContext::new())
            .unwrap();
        assert_eq!(exists, expected);
    }

    #[rstest]
    fn test_where_not_phrasing() {
        let compiled = QueryExecutor::<User>::new(Dialect::Sqlite.driver(), None, "posts")
            .where_not("status", "=", "archived")
            .compile();
        assert_eq!(compiled.sql, "SELECT * FROM posts WHERE status NOT = ?");
        assert_eq!(compiled.args, vec![Value::from("archived")]);
    }

    // The IN group is rendered from the value count alone; the values are dropped.
    #[rstest]
    fn test_where_in_does_not_bind_values() {
        let compiled = QueryExecutor::<User>::new(Dialect::Postgres.driver(), None, "users")
            .where_in("id", [1, 2, 3])
            .where_("age", ">", 18)
            .compile();
        assert_eq!(
            compiled.sql,
            "SELECT * FROM users WHERE id IN (?,?,?) AND age > $1"
        );
        assert_eq!(compiled.args, vec![Value::Int(18)]);
    }

    #[rstest]
    fn test_select_limit_offset_include() {
        let builder = QueryExecutor::<User>::new(Dialect::Sqlite.driver(), None, "users")
            .select(&["id", "email"])
            .order_by("id", Direction::Asc)
            .limit(10)
            .offset(20)
            .include(&["posts"]);
        assert_eq!(builder.query().includes, vec!["posts"]);
        assert_eq!(
            builder.compile().sql,
            "SELECT id, email FROM users ORDER BY id ASC LIMIT 10 OFFSET 20"
        );
    }

    #[rstest]
    fn test_terminals_require_executor() {
        let ctx = ExecContext::new();
        let offline = || QueryExecutor::<User>::new(Dialect::Sqlite.driver(), None, "users");
        assert!(matches!(offline().all(&ctx).err(), Some(QueryError::NotInitialized)));
        assert!(matches!(offline().first(&ctx), Err(QueryError::NotInitialized)));
        assert!(matches!(offline().last(&ctx), Err(QueryError::NotInitialized)));
        assert!(matches!(offline().count(&ctx), Err(QueryError::NotInitialized)));
        assert!(matches!(offline().exists(&ctx), Err(QueryError::NotInitialized)));
        assert!(matches!(offline().find_by_id(&ctx, 1), Err(QueryError::NotInitialized)));
    }

    #[rstest]
    fn test_execution_failure_carries_table() {
        let executor = RecordingExecutor::new().failing("connection reset");
        let err = users(Dialect::Sqlite, &executor)
            .first(&ExecContext::new())
            .unwrap_err();
        match err {
            QueryError::Execution { table, source } => {
                assert_eq!(table, "users");
                assert_eq!(source.to_string(), "connection reset");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn test_decode_failure_propagates() {
        let executor = RecordingExecutor::new().with_rows(&["id"], vec![vec![Value::Int(1)]]);
        let err = users(Dialect::Sqlite, &executor)
            .first(&ExecContext::new())
            .unwrap_err();
        match err {
            QueryError::Decode { table, source } => {
                assert_eq!(table, "users");
                assert_eq!(source.to_string(), "Missing column 'email' in query result");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn test_context_is_forwarded() {
        let executor = RecordingExecutor::new();
        let ctx = ExecContext::new();
        ctx.cancel();
        let err = users(Dialect::Sqlite, &executor).count(&ctx).unwrap_err();
        assert!(matches!(err, QueryError::Execution { .. }));
    }
}
