//! Result sets and row decoding.

use std::collections::BTreeMap;

use serde::Serialize;

use super::DbError;
use super::backend::BoxError;
use super::value::{DatabaseValue, Value};

/// Rows returned by an executor, column names in `headers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row view at `index`.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            headers: &self.headers,
            values,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            headers: &self.headers,
            values,
        })
    }
}

/// Borrowed view of one result row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn columns(&self) -> &'a [String] {
        self.headers
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    pub fn get_index(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index)
    }

    /// Value of the named column.
    pub fn get(&self, column: &str) -> Result<&'a Value, DbError> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| DbError::MissingColumn {
                name: column.to_string(),
            })
    }

    pub fn get_i64(&self, column: &str) -> Result<i64, DbError> {
        let value = self.get(column)?;
        value.as_i64().ok_or_else(|| mismatch(column, "int", value))
    }

    pub fn get_f64(&self, column: &str) -> Result<f64, DbError> {
        let value = self.get(column)?;
        value.as_f64().ok_or_else(|| mismatch(column, "float", value))
    }

    pub fn get_bool(&self, column: &str) -> Result<bool, DbError> {
        let value = self.get(column)?;
        value.as_bool().ok_or_else(|| mismatch(column, "bool", value))
    }

    pub fn get_string(&self, column: &str) -> Result<String, DbError> {
        let value = self.get(column)?;
        value.as_string().ok_or_else(|| mismatch(column, "text", value))
    }

    /// Like `get_string`, but `NULL` yields `None`.
    pub fn get_opt_string(&self, column: &str) -> Result<Option<String>, DbError> {
        match self.get(column)? {
            Value::Null => Ok(None),
            value => value
                .as_string()
                .map(Some)
                .ok_or_else(|| mismatch(column, "text", value)),
        }
    }

    /// Like `get_i64`, but `NULL` yields `None`.
    pub fn get_opt_i64(&self, column: &str) -> Result<Option<i64>, DbError> {
        match self.get(column)? {
            Value::Null => Ok(None),
            value => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| mismatch(column, "int", value)),
        }
    }
}

fn mismatch(column: &str, expected: &'static str, found: &Value) -> DbError {
    DbError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: found.type_name(),
    }
}

/// Decode a domain object from a result row.
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> Result<Self, BoxError>;
}

/// Column name → value, for callers without a domain type.
impl FromRow for BTreeMap<String, Value> {
    fn from_row(row: &Row<'_>) -> Result<Self, BoxError> {
        Ok(row
            .columns()
            .iter()
            .cloned()
            .zip(row.values().iter().cloned())
            .collect())
    }
}

/// Raw values in column order.
impl FromRow for Vec<Value> {
    fn from_row(row: &Row<'_>) -> Result<Self, BoxError> {
        Ok(row.values().to_vec())
    }
}
