//! Output formatting for compile command results.

use super::execute::CompileResult;
use crate::db::Value;
use crate::output::Outputable;

impl Outputable for CompileResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Dialect: {}", self.dialect));
        lines.push(String::new());
        lines.push(self.sql.clone());
        lines.push(String::new());

        if self.args.is_empty() {
            lines.push("Args: none".to_string());
        } else {
            lines.push(format!("Args ({}):", self.args.len()));
            for (i, arg) in self.args.iter().enumerate() {
                lines.push(format!("  {}: {}", i + 1, arg_label(arg)));
            }
        }

        lines.join("\n")
    }
}

// Text is quoted so `'18'` and `18` stay distinguishable.
fn arg_label(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}
