//! SQL dialect identity.
//!
//! The set of supported backends is fixed: PostgreSQL, MySQL and SQLite.
//! Everything dialect-specific (type names, placeholders, literals) hangs off
//! this enum or the driver selected by it.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::drivers::{DriverError, DriverImpl, MysqlDriver, PostgresDriver, SqliteDriver};

/// One of the three supported SQL backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    Mysql,
    #[default]
    Sqlite,
}

impl Dialect {
    /// All dialects, in a stable order.
    pub const ALL: [Dialect; 3] = [Dialect::Postgres, Dialect::Mysql, Dialect::Sqlite];

    /// Canonical dialect name (`postgres`, `mysql`, `sqlite`).
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Returns the driver implementing this dialect.
    pub fn driver(&self) -> DriverImpl {
        match self {
            Dialect::Postgres => PostgresDriver.into(),
            Dialect::Mysql => MysqlDriver.into(),
            Dialect::Sqlite => SqliteDriver.into(),
        }
    }

    /// Detect the dialect from a connection URL.
    ///
    /// Recognised forms:
    /// - `postgres://...`, `postgresql://...` → Postgres
    /// - `mysql://...` → Mysql
    /// - `sqlite://...`, `file:...`, `:memory:`, plain paths → Sqlite
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Dialect::Postgres
        } else if url.starts_with("mysql://") {
            Dialect::Mysql
        } else {
            Dialect::Sqlite
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::Mysql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            _ => Err(DriverError::UnknownDialect {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::Driver;
    use rstest::rstest;

    #[rstest]
    #[case("postgres", Dialect::Postgres)]
    #[case("PostgreSQL", Dialect::Postgres)]
    #[case("mysql", Dialect::Mysql)]
    #[case("sqlite", Dialect::Sqlite)]
    #[case("sqlite3", Dialect::Sqlite)]
    fn test_parse_dialect(#[case] input: &str, #[case] expected: Dialect) {
        assert_eq!(input.parse::<Dialect>().unwrap(), expected);
    }

    #[rstest]
    fn test_parse_unknown_dialect() {
        let err = "oracle".parse::<Dialect>().unwrap_err();
        assert!(err.to_string().contains("oracle"));
    }

    #[rstest]
    #[case("postgres://u:p@localhost/db", Dialect::Postgres)]
    #[case("postgresql://localhost/db", Dialect::Postgres)]
    #[case("mysql://root@localhost/db", Dialect::Mysql)]
    #[case("sqlite://./app.db", Dialect::Sqlite)]
    #[case("file:app.db", Dialect::Sqlite)]
    #[case(":memory:", Dialect::Sqlite)]
    #[case("./app.db", Dialect::Sqlite)]
    fn test_from_url(#[case] url: &str, #[case] expected: Dialect) {
        assert_eq!(Dialect::from_url(url), expected);
    }

    #[rstest]
    fn test_driver_reports_same_dialect() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.driver().dialect(), dialect);
            assert_eq!(dialect.driver().dialect_name(), dialect.name());
        }
    }

    #[rstest]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Dialect::Mysql).unwrap();
        assert_eq!(json, "\"mysql\"");
        let parsed: Dialect = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(parsed, Dialect::Postgres);
    }
}
