//! Output formatting for migrate command results.

use super::execute::MigrateResult;
use crate::output::Outputable;

impl Outputable for MigrateResult {
    fn to_table(&self) -> String {
        if !self.dry_run {
            return format!("Migrations applied ({}).", self.dialect);
        }

        let mut lines = vec![
            format!("DRY RUN ({}) - no changes will be applied", self.dialect),
            String::new(),
        ];

        if self.statements.is_empty() {
            lines.push("Nothing to migrate.".to_string());
        } else {
            lines.push(format!("{} statement(s):", self.statements.len()));
            for statement in &self.statements {
                lines.push(String::new());
                lines.push(format!("{};", statement));
            }
        }

        lines.join("\n")
    }
}
