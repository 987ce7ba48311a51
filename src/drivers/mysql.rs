//! MySQL driver.
//!
//! Bare `?` placeholders, `INT AUTO_INCREMENT` surrogate keys and an
//! `ENGINE=InnoDB DEFAULT CHARSET=utf8mb4` table trailer.

use super::Driver;
use crate::dialect::Dialect;

const TABLE_OPTIONS: &str = "ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MysqlDriver;

impl Driver for MysqlDriver {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    fn auto_increment_type(&self) -> &'static str {
        "INT AUTO_INCREMENT"
    }

    fn table_options(&self) -> Option<&'static str> {
        Some(TABLE_OPTIONS)
    }
}
