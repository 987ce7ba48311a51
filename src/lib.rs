//! comet library - schema-first model compiler and SQL query builder
//!
//! Parses `.cmt` schema files into a dialect-independent model IR, generates
//! `CREATE TABLE` statements for PostgreSQL, MySQL and SQLite, and compiles
//! fluent queries into parameterised SQL run through a pluggable executor.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod dialect;
pub mod drivers;
pub mod output;
pub mod query;
pub mod schema;
pub mod utils;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod fixtures;

#[cfg(test)]
pub mod test_utils;

pub use db::{Database, DatabaseConfig, DbError, ExecContext, Executor, Value};
pub use dialect::Dialect;
pub use query::{QueryError, QueryExecutor};
pub use schema::{load_schema, parse_schema, Schema};
