//! Explicit database handle.
//!
//! A `Database` pairs a dialect driver with an optional executor. Without an
//! executor it can still compile queries; terminal operations then report
//! `NotInitialized`.

use tracing::debug;

use super::DbError;
use super::backend::{Connector, Executor};
use super::config::DatabaseConfig;
use super::context::ExecContext;
use super::row::FromRow;
use crate::dialect::Dialect;
use crate::drivers::{Driver, DriverImpl};
use crate::query::QueryExecutor;
use crate::schema::{ModelSchema, Schema};

pub struct Database {
    driver: DriverImpl,
    executor: Option<Box<dyn Executor>>,
}

impl Database {
    /// Handle with no executor attached.
    pub fn offline(dialect: Dialect) -> Self {
        Self {
            driver: dialect.driver(),
            executor: None,
        }
    }

    /// Handle around an already-open executor.
    pub fn new(dialect: Dialect, executor: Box<dyn Executor>) -> Self {
        Self {
            driver: dialect.driver(),
            executor: Some(executor),
        }
    }

    /// Open a connection through `connector` and run the dialect's session setup.
    pub fn connect(
        config: &DatabaseConfig,
        connector: &dyn Connector,
        ctx: &ExecContext,
    ) -> Result<Self, DbError> {
        let driver = config.dialect.driver();
        let dsn = driver.normalize_dsn(&config.url);

        let executor = connector
            .connect(config.dialect, &dsn, ctx)
            .map_err(|e| DbError::Connect {
                dialect: config.dialect.name(),
                message: e.to_string(),
            })?;

        for statement in driver.session_setup() {
            executor
                .execute(ctx, statement, &[])
                .map_err(|source| DbError::Execution {
                    sql: statement.to_string(),
                    source,
                })?;
        }

        debug!(dialect = %config.dialect, backend = executor.backend_name(), "connected");
        Ok(Self {
            driver,
            executor: Some(executor),
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.driver.dialect()
    }

    pub fn driver(&self) -> &DriverImpl {
        &self.driver
    }

    pub fn executor(&self) -> Option<&dyn Executor> {
        self.executor.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.executor.is_some()
    }

    /// Query builder over a table by name. Fetch-last orders by `id`.
    pub fn table<T: FromRow>(&self, table: &str) -> QueryExecutor<'_, T> {
        QueryExecutor::new(self.driver, self.executor(), table)
    }

    /// Query builder over a model's table, keyed on its primary field.
    pub fn model<T: FromRow>(&self, model: &ModelSchema) -> QueryExecutor<'_, T> {
        let builder = QueryExecutor::new(self.driver, self.executor(), &model.table_name);
        match model.primary_key() {
            Some(pk) => builder.with_primary_key(&pk.name),
            None => builder,
        }
    }

    /// Run `CREATE TABLE IF NOT EXISTS` for every model, in schema order.
    ///
    /// Returns the number of statements executed.
    pub fn create_tables(&self, ctx: &ExecContext, schema: &Schema) -> Result<usize, DbError> {
        let executor = self.executor().ok_or(DbError::NotInitialized)?;
        for model in &schema.models {
            let sql = self.driver.create_table(model);
            executor
                .execute(ctx, &sql, &[])
                .map_err(|source| DbError::Execution { sql, source })?;
        }
        Ok(schema.models.len())
    }

    /// Apply a schema. Always fails with `NotImplemented`.
    pub fn migrate(&self, schema: &Schema) -> Result<(), DbError> {
        self.driver.migrate(schema)?;
        Ok(())
    }
}
