//! Per-dialect SQL generation.
//!
//! Each driver supplies a handful of syntax hooks (placeholder style, boolean
//! literals, auto-increment column syntax, table trailer). DDL and SELECT
//! compilation are shared and live in [`common`], parameterised by those hooks.
//!
//! - [`postgres`]: `$N` placeholders, `SERIAL` keys
//! - [`mysql`]: `?` placeholders, `INT AUTO_INCREMENT`, InnoDB trailer
//! - [`sqlite`]: `?` placeholders, `INTEGER ... AUTOINCREMENT`, `0`/`1` booleans
//!
//! # enum_dispatch
//!
//! The dialect set is closed, so drivers are variants of [`DriverImpl`] rather
//! than `Box<dyn Driver>`. `enum_dispatch` generates the forwarding impl and the
//! `From<PostgresDriver>` (etc.) conversions used by `Dialect::driver`.

pub mod common;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use mysql::MysqlDriver;
pub use postgres::PostgresDriver;
pub use sqlite::SqliteDriver;

use enum_dispatch::enum_dispatch;
use thiserror::Error;

use crate::dialect::Dialect;
use crate::query::{CompiledQuery, Query};
use crate::schema::{FieldSchema, ModelSchema, Schema};

/// Driver error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("{feature} not implemented yet ({dialect})")]
    NotImplemented {
        feature: &'static str,
        dialect: &'static str,
    },

    #[error("Unknown dialect '{name}'. Supported dialects: postgres, mysql, sqlite")]
    UnknownDialect { name: String },
}

/// SQL generation contract shared by every dialect.
///
/// Implementors provide the syntax hooks; the DDL and query compilation
/// methods have shared default implementations.
#[enum_dispatch]
pub trait Driver {
    fn dialect(&self) -> Dialect;

    /// Canonical dialect name (`postgres`, `mysql`, `sqlite`).
    fn dialect_name(&self) -> &'static str {
        self.dialect().name()
    }

    /// Placeholder for the `index`-th bound argument (1-based).
    fn placeholder(&self, index: usize) -> String;

    fn bool_literal(&self, value: bool) -> &'static str;

    /// Column type for a primary + auto-generated field.
    fn auto_increment_type(&self) -> &'static str;

    /// Keyword written after `PRIMARY KEY` on a surrogate key, if any.
    fn auto_increment_suffix(&self) -> Option<&'static str> {
        None
    }

    /// Trailer appended after the closing parenthesis of `CREATE TABLE`.
    fn table_options(&self) -> Option<&'static str> {
        None
    }

    fn column_definition(&self, field: &FieldSchema) -> String {
        common::column_definition(self, field)
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for a model.
    fn create_table(&self, model: &ModelSchema) -> String {
        common::create_table(self, model)
    }

    /// Compile a query into SQL text and ordered arguments.
    fn build_query(&self, query: &Query) -> CompiledQuery {
        common::build_select(self, query)
    }

    /// Apply a schema to a live database. Not implemented for any dialect.
    fn migrate(&self, _schema: &Schema) -> Result<(), DriverError> {
        Err(DriverError::NotImplemented {
            feature: "migrations",
            dialect: self.dialect_name(),
        })
    }

    /// Rewrite a connection string into the form the dialect's client expects.
    fn normalize_dsn(&self, dsn: &str) -> String {
        dsn.to_string()
    }

    /// Statements to run once on a fresh connection.
    fn session_setup(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Closed set of drivers, statically dispatched.
#[enum_dispatch(Driver)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverImpl {
    Postgres(PostgresDriver),
    Mysql(MysqlDriver),
    Sqlite(SqliteDriver),
}
