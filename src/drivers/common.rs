//! DDL and SELECT compilation shared by all drivers.
//!
//! Every function here takes the driver as a generic parameter and reads only
//! its syntax hooks, so the statement shape is identical across dialects.

use tracing::debug;

use super::Driver;
use crate::query::helpers::{format_fields, quote_literal};
use crate::query::{CompiledQuery, Query};
use crate::schema::typemap::column_type;
use crate::schema::{DefaultValue, FieldSchema, ModelSchema};

/// Render one column of a `CREATE TABLE` body.
///
/// Order: name, type, `PRIMARY KEY` (+ suffix), `UNIQUE`, `NOT NULL`, `DEFAULT`.
pub fn column_definition<D: Driver + ?Sized>(driver: &D, field: &FieldSchema) -> String {
    let mut parts: Vec<String> = vec![field.name.clone()];

    if field.is_surrogate_key() {
        parts.push(driver.auto_increment_type().to_string());
    } else {
        parts.push(column_type(&field.field_type, driver.dialect()).to_string());
    }

    if field.primary {
        parts.push("PRIMARY KEY".to_string());
        if field.auto_generate {
            if let Some(suffix) = driver.auto_increment_suffix() {
                parts.push(suffix.to_string());
            }
        }
    }

    if field.unique && !field.primary {
        parts.push("UNIQUE".to_string());
    }

    if !field.optional && !field.primary {
        parts.push("NOT NULL".to_string());
    }

    if let Some(default) = &field.default {
        parts.push(format!("DEFAULT {}", default_literal(driver, default)));
    }

    parts.join(" ")
}

fn default_literal<D: Driver + ?Sized>(driver: &D, default: &DefaultValue) -> String {
    match default {
        DefaultValue::Now => "CURRENT_TIMESTAMP".to_string(),
        DefaultValue::Bool(b) => driver.bool_literal(*b).to_string(),
        DefaultValue::Number(n) => n.clone(),
        DefaultValue::Text(s) => quote_literal(s),
    }
}

/// `CREATE TABLE IF NOT EXISTS <table> (\n  <col>,\n  <col>\n)[ <options>]`
pub fn create_table<D: Driver + ?Sized>(driver: &D, model: &ModelSchema) -> String {
    let columns: Vec<String> = model
        .fields
        .iter()
        .map(|field| driver.column_definition(field))
        .collect();

    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        model.table_name,
        columns.join(",\n  ")
    );
    if let Some(options) = driver.table_options() {
        sql.push(' ');
        sql.push_str(options);
    }

    debug!(dialect = driver.dialect_name(), table = %model.table_name, "generated DDL");
    sql
}

/// Compile a SELECT. Clauses are joined with single spaces, in the order
/// SELECT, WHERE, ORDER BY, LIMIT, OFFSET.
pub fn build_select<D: Driver + ?Sized>(driver: &D, query: &Query) -> CompiledQuery {
    let mut parts = vec![format!(
        "SELECT {} FROM {}",
        format_fields(&query.fields),
        query.table
    )];
    let mut args = Vec::new();

    if !query.wheres.is_empty() {
        let mut conditions = Vec::with_capacity(query.wheres.len());
        for clause in &query.wheres {
            let operator = clause.rendered_operator();
            if clause.is_in() {
                // IN values are pre-rendered and written as-is, never bound.
                conditions.push(format!("{} {} {}", clause.field, operator, clause.value));
            } else {
                args.push(clause.value.clone());
                conditions.push(format!(
                    "{} {} {}",
                    clause.field,
                    operator,
                    driver.placeholder(args.len())
                ));
            }
        }
        parts.push(format!("WHERE {}", conditions.join(" AND ")));
    }

    if !query.orders.is_empty() {
        let orders: Vec<String> = query
            .orders
            .iter()
            .map(|o| format!("{} {}", o.field, o.direction))
            .collect();
        parts.push(format!("ORDER BY {}", orders.join(", ")));
    }

    if let Some(limit) = query.limit {
        parts.push(format!("LIMIT {}", limit));
    }

    if let Some(offset) = query.offset {
        parts.push(format!("OFFSET {}", offset));
    }

    let sql = parts.join(" ");
    debug!(dialect = driver.dialect_name(), sql = %sql, args = args.len(), "compiled query");
    CompiledQuery { sql, args }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Value;
    use crate::dialect::Dialect;
    use crate::drivers::{MysqlDriver, PostgresDriver, SqliteDriver};
    use crate::fixtures::{BLOG_SCHEMA, USER_SCHEMA};
    use crate::query::helpers::placeholder_group;
    use crate::query::{Direction, OrderClause, WhereClause};
    use crate::schema::{parse_schema, FieldType};
    use proptest::prelude::*;
    use rstest::rstest;

    fn users_over_18() -> Query {
        let mut query = Query::new("users");
        query.wheres.push(WhereClause::new("age", ">", 18));
        query
    }

    #[rstest]
    fn test_sqlite_where_uses_bare_placeholder() {
        let compiled = SqliteDriver.build_query(&users_over_18());
        assert_eq!(compiled.sql, "SELECT * FROM users WHERE age > ?");
        assert_eq!(compiled.args, vec![Value::Int(18)]);
    }

    #[rstest]
    fn test_postgres_where_uses_numbered_placeholder() {
        let compiled = PostgresDriver.build_query(&users_over_18());
        assert_eq!(compiled.sql, "SELECT * FROM users WHERE age > $1");
        assert_eq!(compiled.args, vec![Value::Int(18)]);
    }

    #[rstest]
    fn test_negated_clause_prefixes_operator() {
        let mut query = Query::new("posts");
        query.wheres.push(WhereClause::new("status", "=", "archived").negate());
        let compiled = MysqlDriver.build_query(&query);
        assert_eq!(compiled.sql, "SELECT * FROM posts WHERE status NOT = ?");
        assert_eq!(compiled.args, vec![Value::from("archived")]);
    }

    #[rstest]
    fn test_full_clause_order() {
        let mut query = Query::new("users");
        query.fields = vec!["id".to_string(), "email".to_string()];
        query.wheres.push(WhereClause::new("age", ">=", 21));
        query.wheres.push(WhereClause::new("name", "LIKE", "A%"));
        query.orders.push(OrderClause::new("created_at", Direction::Desc));
        query.orders.push(OrderClause::new("id", Direction::Asc));
        query.limit = Some(10);
        query.offset = Some(20);

        let compiled = PostgresDriver.build_query(&query);
        assert_eq!(
            compiled.sql,
            "SELECT id, email FROM users WHERE age >= $1 AND name LIKE $2 \
             ORDER BY created_at DESC, id ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(compiled.args, vec![Value::Int(21), Value::from("A%")]);
    }

    // IN splices its pre-rendered group into the SQL and binds nothing. The
    // group's `?` markers are not matched by any argument.
    #[rstest]
    #[case(Dialect::Postgres, "SELECT * FROM users WHERE id IN (?,?) AND age > $1")]
    #[case(Dialect::Mysql, "SELECT * FROM users WHERE id IN (?,?) AND age > ?")]
    #[case(Dialect::Sqlite, "SELECT * FROM users WHERE id IN (?,?) AND age > ?")]
    fn test_in_operator_is_spliced_not_bound(#[case] dialect: Dialect, #[case] expected: &str) {
        let mut query = Query::new("users");
        query.wheres.push(WhereClause::new("id", "IN", placeholder_group(2)));
        query.wheres.push(WhereClause::new("age", ">", 18));

        let compiled = dialect.driver().build_query(&query);
        assert_eq!(compiled.sql, expected);
        assert_eq!(compiled.args, vec![Value::Int(18)]);
    }

    #[rstest]
    fn test_in_operator_splices_caller_text_verbatim() {
        let mut query = Query::new("users");
        query.wheres.push(WhereClause::new("id", "IN", "(1) OR 1=1"));
        let compiled = SqliteDriver.build_query(&query);
        assert_eq!(compiled.sql, "SELECT * FROM users WHERE id IN (1) OR 1=1");
        assert!(compiled.args.is_empty());
    }

    #[rstest]
    #[case(Dialect::Postgres, "SELECT * FROM users WHERE role in $1")]
    #[case(Dialect::Mysql, "SELECT * FROM users WHERE role in ?")]
    #[case(Dialect::Sqlite, "SELECT * FROM users WHERE role in ?")]
    fn test_lowercase_in_is_bound_like_other_operators(
        #[case] dialect: Dialect,
        #[case] expected: &str,
    ) {
        let mut query = Query::new("users");
        query.wheres.push(WhereClause::new("role", "in", "admin"));
        let compiled = dialect.driver().build_query(&query);
        assert_eq!(compiled.sql, expected);
        assert_eq!(compiled.args, vec![Value::from("admin")]);
    }

    #[rstest]
    fn test_no_where_no_args() {
        let compiled = SqliteDriver.build_query(&Query::new("users"));
        assert_eq!(compiled.sql, "SELECT * FROM users");
        assert!(compiled.args.is_empty());
    }

    #[rstest]
    fn test_mysql_create_table() {
        let schema = parse_schema(USER_SCHEMA).unwrap();
        let ddl = MysqlDriver.create_table(&schema.models[0]);
        assert!(ddl.contains("INT AUTO_INCREMENT"));
        assert!(ddl.contains("PRIMARY KEY"));
        assert!(ddl.contains("UNIQUE"));
        assert!(ddl.ends_with("ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"));
        assert_eq!(
            ddl,
            "CREATE TABLE IF NOT EXISTS users (\n  id INT AUTO_INCREMENT PRIMARY KEY,\n  \
             email VARCHAR(255) UNIQUE NOT NULL\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"
        );
    }

    #[rstest]
    fn test_postgres_create_table() {
        let schema = parse_schema(USER_SCHEMA).unwrap();
        let ddl = PostgresDriver.create_table(&schema.models[0]);
        assert_eq!(
            ddl,
            "CREATE TABLE IF NOT EXISTS users (\n  id SERIAL PRIMARY KEY,\n  \
             email VARCHAR(255) UNIQUE NOT NULL\n)"
        );
    }

    #[rstest]
    fn test_sqlite_create_table() {
        let schema = parse_schema(USER_SCHEMA).unwrap();
        let ddl = SqliteDriver.create_table(&schema.models[0]);
        assert_eq!(
            ddl,
            "CREATE TABLE IF NOT EXISTS users (\n  id INTEGER PRIMARY KEY AUTOINCREMENT,\n  \
             email TEXT UNIQUE NOT NULL\n)"
        );
    }

    #[rstest]
    #[case(Dialect::Postgres, "is_active BOOLEAN NOT NULL DEFAULT TRUE")]
    #[case(Dialect::Mysql, "is_active BOOLEAN NOT NULL DEFAULT TRUE")]
    #[case(Dialect::Sqlite, "is_active INTEGER NOT NULL DEFAULT 1")]
    fn test_bool_default_literal(#[case] dialect: Dialect, #[case] expected: &str) {
        let mut field = FieldSchema::new("is_active", FieldType::Boolean);
        field.default = Some(DefaultValue::Bool(true));
        assert_eq!(dialect.driver().column_definition(&field), expected);
    }

    #[rstest]
    fn test_default_literals() {
        let schema = parse_schema(BLOG_SCHEMA).unwrap();
        let post = schema.model("Post").unwrap();
        let ddl = PostgresDriver.create_table(post);
        assert!(ddl.contains("published BOOLEAN NOT NULL DEFAULT FALSE"));
        assert!(ddl.contains("views INTEGER NOT NULL DEFAULT 0"));
        assert!(ddl.contains("status VARCHAR(255) NOT NULL DEFAULT 'draft'"));
        assert!(ddl.contains("rating DOUBLE PRECISION,"));

        let user = schema.model("User").unwrap();
        let ddl = SqliteDriver.create_table(user);
        assert!(ddl.contains("createdAt DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP"));
        assert!(ddl.contains("updatedAt DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP"));
    }

    #[rstest]
    fn test_text_default_escapes_quotes() {
        let mut field = FieldSchema::new("motto", FieldType::String);
        field.default = Some(DefaultValue::Text("it's".to_string()));
        assert_eq!(
            SqliteDriver.column_definition(&field),
            "motto TEXT NOT NULL DEFAULT 'it''s'"
        );
    }

    #[rstest]
    fn test_optional_field_has_no_not_null() {
        let schema = parse_schema("model Profile {\n  id Int @id\n  name String?\n}").unwrap();
        let field = schema.models[0].field("name").unwrap();
        assert_eq!(field.field_type, FieldType::String);
        assert!(field.optional);
        for dialect in Dialect::ALL {
            assert!(!dialect.driver().column_definition(field).contains("NOT NULL"));
        }
    }

    #[rstest]
    fn test_non_auto_primary_key_uses_mapped_type() {
        let mut field = FieldSchema::new("code", FieldType::String);
        field.primary = true;
        field.unique = true;
        assert_eq!(
            PostgresDriver.column_definition(&field),
            "code VARCHAR(255) PRIMARY KEY"
        );
    }

    #[rstest]
    fn test_create_table_is_deterministic() {
        let schema = parse_schema(BLOG_SCHEMA).unwrap();
        for dialect in Dialect::ALL {
            let driver = dialect.driver();
            for model in &schema.models {
                assert_eq!(driver.create_table(model), driver.create_table(model));
            }
        }
    }

    fn count_constraint_tokens(column: &str) -> usize {
        ["PRIMARY KEY", "UNIQUE", "NOT NULL", "DEFAULT"]
            .iter()
            .filter(|token| column.contains(*token))
            .count()
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_primary_key_never_gets_not_null(#[case] optional: bool) {
        let mut field = FieldSchema::new("id", FieldType::Int);
        field.primary = true;
        field.optional = optional;
        assert_eq!(SqliteDriver.column_definition(&field), "id INTEGER PRIMARY KEY");
    }

    proptest! {
        #[test]
        fn prop_placeholders_match_args(
            ops in proptest::collection::vec(
                (prop_oneof![Just("="), Just(">"), Just("<"), Just("LIKE")], any::<i64>(), any::<bool>()),
                0..8,
            ),
            limit in proptest::option::of(0u64..1000),
        ) {
            let mut query = Query::new("items");
            for (i, (op, value, negated)) in ops.iter().enumerate() {
                let mut clause = WhereClause::new(format!("f{}", i), *op, *value);
                clause.negated = *negated;
                query.wheres.push(clause);
            }
            query.limit = limit;

            let sqlite = SqliteDriver.build_query(&query);
            prop_assert_eq!(sqlite.sql.matches('?').count(), sqlite.args.len());

            let postgres = PostgresDriver.build_query(&query);
            prop_assert_eq!(postgres.args.len(), ops.len());
            let mut last = 0;
            for n in 1..=postgres.args.len() {
                let marker = format!("${}", n);
                let pos = postgres.sql.find(&marker);
                prop_assert!(pos.is_some());
                let pos = pos.unwrap();
                prop_assert!(pos >= last);
                last = pos;
            }
            for (arg, (_, value, _)) in postgres.args.iter().zip(ops.iter()) {
                prop_assert_eq!(arg, &Value::Int(*value));
            }
        }

        #[test]
        fn prop_constraint_tokens_match_flags(
            primary in any::<bool>(),
            auto in any::<bool>(),
            unique in any::<bool>(),
            optional in any::<bool>(),
            with_default in any::<bool>(),
        ) {
            let mut field = FieldSchema::new("value", FieldType::Int);
            field.primary = primary;
            field.auto_generate = auto;
            field.unique = unique;
            field.optional = optional;
            if with_default {
                field.default = Some(DefaultValue::Number("1".to_string()));
            }
            let expected = usize::from(primary)
                + usize::from(unique && !primary)
                + usize::from(!optional && !primary)
                + usize::from(with_default);
            for dialect in Dialect::ALL {
                let column = dialect.driver().column_definition(&field);
                prop_assert_eq!(count_constraint_tokens(&column), expected);
            }
        }
    }
}
