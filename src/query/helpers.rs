//! Helper utilities for query building.
//!
//! Small formatting functions shared by the drivers and the query façade.

/// Format a list of field names as a comma-separated string.
///
/// Used for SELECT clauses. An empty list projects every column.
pub fn format_fields<S: AsRef<str>>(fields: &[S]) -> String {
    if fields.is_empty() {
        return "*".to_string();
    }
    fields
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parenthesised group of `count` bare placeholders, e.g. `(?,?,?)`.
///
/// This is the pre-rendered value an `IN` clause carries.
pub fn placeholder_group(count: usize) -> String {
    format!("({})", vec!["?"; count].join(","))
}

/// Quote a string literal with single quotes, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
