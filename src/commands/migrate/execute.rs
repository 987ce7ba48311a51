use std::error::Error;

use serde::Serialize;

use super::MigrateCmd;
use crate::commands::{load_command_schema, target_dialect, Execute};
use crate::config::ConfigFile;
use crate::db::Database;
use crate::dialect::Dialect;
use crate::drivers::Driver;

/// Result of the migrate command execution
#[derive(Debug, Serialize)]
pub struct MigrateResult {
    pub dialect: Dialect,
    pub dry_run: bool,
    pub statements: Vec<String>,
}

impl Execute for MigrateCmd {
    type Output = MigrateResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let (_, schema) = load_command_schema(self.path.as_deref(), config)?;
        let dialect = target_dialect(self.dialect, config);
        let db = Database::offline(dialect);

        if self.dry_run {
            let statements = schema
                .models
                .iter()
                .map(|model| db.driver().create_table(model))
                .collect();
            return Ok(MigrateResult {
                dialect,
                dry_run: true,
                statements,
            });
        }

        db.migrate(&schema)?;
        Ok(MigrateResult {
            dialect,
            dry_run: false,
            statements: Vec::new(),
        })
    }
}
