//! Abstract field type → concrete column type.
//!
//! | Schema type | postgres | mysql | sqlite |
//! |-------------|----------|-------|--------|
//! | Int | INTEGER | INT | INTEGER |
//! | Int64 | BIGINT | BIGINT | INTEGER |
//! | String | VARCHAR(255) | VARCHAR(255) | TEXT |
//! | Boolean | BOOLEAN | BOOLEAN | INTEGER |
//! | Float | DOUBLE PRECISION | DOUBLE | REAL |
//! | DateTime | TIMESTAMP | TIMESTAMP | DATETIME |
//! | anything else | TEXT | TEXT | TEXT |

use super::definition::FieldType;
use crate::dialect::Dialect;

/// Resolve a schema type name for a dialect. Never fails.
///
/// A trailing `?` is ignored.
pub fn resolve(abstract_type: &str, dialect: Dialect) -> &'static str {
    column_type(&FieldType::parse(abstract_type), dialect)
}

/// Concrete column type for a parsed field type.
pub fn column_type(field_type: &FieldType, dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Postgres => match field_type {
            FieldType::Int => "INTEGER",
            FieldType::Int64 => "BIGINT",
            FieldType::String => "VARCHAR(255)",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Float => "DOUBLE PRECISION",
            FieldType::DateTime => "TIMESTAMP",
            FieldType::Other(_) => "TEXT",
        },
        Dialect::Mysql => match field_type {
            FieldType::Int => "INT",
            FieldType::Int64 => "BIGINT",
            FieldType::String => "VARCHAR(255)",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Float => "DOUBLE",
            FieldType::DateTime => "TIMESTAMP",
            FieldType::Other(_) => "TEXT",
        },
        Dialect::Sqlite => match field_type {
            FieldType::Int | FieldType::Int64 | FieldType::Boolean => "INTEGER",
            FieldType::String => "TEXT",
            FieldType::Float => "REAL",
            FieldType::DateTime => "DATETIME",
            FieldType::Other(_) => "TEXT",
        },
    }
}
