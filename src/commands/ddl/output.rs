//! Output formatting for ddl command results.

use super::execute::DdlResult;
use crate::output::Outputable;

impl Outputable for DdlResult {
    fn to_table(&self) -> String {
        if self.tables.is_empty() {
            return format!("-- {}: no models found", self.dialect);
        }

        let statements: Vec<String> = self
            .tables
            .iter()
            .map(|t| format!("-- {} ({})\n{};", t.model, t.table, t.sql))
            .collect();

        format!("-- dialect: {}\n\n{}", self.dialect, statements.join("\n\n"))
    }
}
