//! Execution boundary.
//!
//! This module defines what the core hands to, and expects back from, the
//! component that actually talks to a database:
//! - Values bound as arguments and returned in rows (`Value`)
//! - Result sets and row decoding (`QueryResult`, `Row`, `FromRow`)
//! - The collaborator traits (`Executor`, `Connector`)
//! - The explicit handle tying a driver to an executor (`Database`)
//!
//! # Architecture
//!
//! There is no process-wide connection. A `Database` is constructed by the
//! caller and lends its executor to each `QueryExecutor` it creates, so any
//! number of handles (and dialects) can coexist.
//!
//! # Type Decisions
//!
//! **Why a closed `Value` enum instead of `Box<dyn Any>` arguments?**
//! Emptiness checks, JSON output and argument comparison in tests all need to
//! see the concrete variant. Five variants cover every column type the type
//! mapper can produce.
//!
//! **Why boxed collaborator errors?**
//! Executors belong to the caller and can fail in any way. The core wraps the
//! failure with the table or statement involved and otherwise leaves it alone.

mod backend;
mod config;
mod connection;
mod context;
mod row;
mod value;

pub use backend::{BoxError, Connector, Executor};
pub use config::{DatabaseConfig, DATABASE_URL_ENV, DEFAULT_DATABASE_URL};
pub use connection::Database;
pub use context::ExecContext;
pub use row::{FromRow, QueryResult, Row};
pub use value::{DatabaseValue, Value};

use thiserror::Error;

use crate::drivers::DriverError;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database not initialized")]
    NotInitialized,

    #[error("Failed to connect to {dialect} database: {message}")]
    Connect {
        dialect: &'static str,
        message: String,
    },

    #[error("Statement failed: {source}\n  {sql}")]
    Execution {
        sql: String,
        #[source]
        source: BoxError,
    },

    #[error("Missing column '{name}' in query result")]
    MissingColumn { name: String },

    #[error("Column '{column}' has type {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Driver(#[from] DriverError),
}
