use std::error::Error;

use serde::Serialize;

use super::CompileCmd;
use crate::commands::{target_dialect, Execute};
use crate::config::ConfigFile;
use crate::db::Value;
use crate::dialect::Dialect;
use crate::query::QueryExecutor;

/// Result of the compile command execution
#[derive(Debug, Serialize)]
pub struct CompileResult {
    pub dialect: Dialect,
    pub table: String,
    pub sql: String,
    pub args: Vec<Value>,
}

impl Execute for CompileCmd {
    type Output = CompileResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let dialect = target_dialect(self.dialect, config);
        let mut builder = QueryExecutor::<Vec<Value>>::new(dialect.driver(), None, &self.table);

        if !self.select.is_empty() {
            let fields: Vec<&str> = self.select.iter().map(String::as_str).collect();
            builder = builder.select(&fields);
        }
        for filter in self.filters {
            builder = builder.where_(&filter.field, &filter.operator, filter.value);
        }
        for filter in self.negated {
            builder = builder.where_not(&filter.field, &filter.operator, filter.value);
        }
        for membership in self.memberships {
            builder = builder.where_in(&membership.field, membership.values);
        }
        for order in self.order {
            builder = builder.order_by(&order.field, order.direction);
        }
        if let Some(limit) = self.limit {
            builder = builder.limit(limit);
        }
        if let Some(offset) = self.offset {
            builder = builder.offset(offset);
        }

        let compiled = builder.compile();
        Ok(CompileResult {
            dialect,
            table: self.table,
            sql: compiled.sql,
            args: compiled.args,
        })
    }
}
