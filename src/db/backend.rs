//! Execution collaborator contract.
//!
//! The core never talks to a database itself. Compiled SQL is handed to an
//! [`Executor`] supplied by the caller; a [`Connector`] builds one from a
//! dialect and connection string.

use std::error::Error;

use super::context::ExecContext;
use super::row::QueryResult;
use super::value::Value;
use crate::dialect::Dialect;

/// Boxed failure reported by an execution collaborator.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Runs compiled SQL against a live connection.
///
/// Implementations own retries, pooling and blocking; the context carries the
/// caller's deadline and cancellation flag.
pub trait Executor: Send + Sync {
    /// Run a statement that returns rows.
    fn query(&self, ctx: &ExecContext, sql: &str, args: &[Value]) -> Result<QueryResult, BoxError>;

    /// Run a statement that returns an affected-row count.
    fn execute(&self, ctx: &ExecContext, sql: &str, args: &[Value]) -> Result<u64, BoxError>;

    /// Get the backend name for logging/debugging.
    fn backend_name(&self) -> &'static str {
        "external"
    }
}

/// Opens executors.
pub trait Connector {
    /// Open a connection. `dsn` has already been normalised by the dialect's driver.
    fn connect(
        &self,
        dialect: Dialect,
        dsn: &str,
        ctx: &ExecContext,
    ) -> Result<Box<dyn Executor>, BoxError>;
}
