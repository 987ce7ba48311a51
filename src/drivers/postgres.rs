//! PostgreSQL driver.
//!
//! - `$N` placeholders, numbered per bound argument
//! - `SERIAL` for surrogate keys
//! - `TRUE`/`FALSE` boolean literals

use super::Driver;
use crate::dialect::Dialect;

/// PostgreSQL syntax hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostgresDriver;

impl Driver for PostgresDriver {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    fn auto_increment_type(&self) -> &'static str {
        "SERIAL"
    }
}
