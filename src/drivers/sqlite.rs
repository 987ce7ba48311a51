//! SQLite driver.

use super::Driver;
use crate::dialect::Dialect;

/// Connection-string prefixes stripped before handing the path to the client.
const DSN_PREFIXES: [&str; 2] = ["sqlite://", "file:"];

const SESSION_SETUP: &[&str] = &["PRAGMA foreign_keys = ON"];

/// SQLite syntax hooks.
///
/// Booleans are stored as integers, so boolean defaults render as `1`/`0`.
/// Surrogate keys are `INTEGER PRIMARY KEY AUTOINCREMENT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqliteDriver;

impl Driver for SqliteDriver {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn auto_increment_type(&self) -> &'static str {
        "INTEGER"
    }

    fn auto_increment_suffix(&self) -> Option<&'static str> {
        Some("AUTOINCREMENT")
    }

    fn normalize_dsn(&self, dsn: &str) -> String {
        let mut dsn = dsn;
        for prefix in DSN_PREFIXES {
            if let Some(rest) = dsn.strip_prefix(prefix) {
                dsn = rest;
            }
        }
        dsn.to_string()
    }

    fn session_setup(&self) -> &'static [&'static str] {
        SESSION_SETUP
    }
}
