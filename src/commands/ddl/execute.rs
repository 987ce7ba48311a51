use std::error::Error;

use serde::Serialize;
use thiserror::Error;

use super::DdlCmd;
use crate::commands::{load_command_schema, target_dialect, Execute};
use crate::config::ConfigFile;
use crate::dialect::Dialect;
use crate::drivers::Driver;
use crate::schema::{ModelSchema, Schema};

#[derive(Error, Debug)]
pub enum DdlError {
    #[error("Model '{name}' not found in schema")]
    UnknownModel { name: String },
}

/// CREATE TABLE statement for one model
#[derive(Debug, Clone, Serialize)]
pub struct TableDdl {
    pub model: String,
    pub table: String,
    pub sql: String,
}

/// Result of the ddl command execution
#[derive(Debug, Serialize)]
pub struct DdlResult {
    pub dialect: Dialect,
    pub tables: Vec<TableDdl>,
}

impl DdlResult {
    /// Generate DDL for every model of `schema`, in declaration order.
    pub fn from_schema(dialect: Dialect, schema: &Schema) -> Self {
        let driver = dialect.driver();
        let tables = schema
            .models
            .iter()
            .map(|model| table_ddl(&driver, model))
            .collect();
        Self { dialect, tables }
    }
}

fn table_ddl(driver: &impl Driver, model: &ModelSchema) -> TableDdl {
    TableDdl {
        model: model.name.clone(),
        table: model.table_name.clone(),
        sql: driver.create_table(model),
    }
}

impl Execute for DdlCmd {
    type Output = DdlResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let (_, schema) = load_command_schema(self.path.as_deref(), config)?;
        let dialect = target_dialect(self.dialect, config);

        match self.model {
            Some(name) => {
                let model = schema
                    .model(&name)
                    .ok_or(DdlError::UnknownModel { name: name.clone() })?;
                Ok(DdlResult {
                    dialect,
                    tables: vec![table_ddl(&dialect.driver(), model)],
                })
            }
            None => Ok(DdlResult::from_schema(dialect, &schema)),
        }
    }
}
