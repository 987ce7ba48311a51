//! Abstract, dialect-independent query description.
//!
//! A `Query` is built up by [`QueryExecutor`] and handed to a driver's
//! `build_query`, which turns it into a [`CompiledQuery`]: SQL text plus the
//! positional arguments in placeholder order.
//!
//! # Operators
//!
//! Where-clause operators are passed through verbatim (`=`, `>`, `LIKE`, ...).
//! Uppercase `IN` is the one exception: its value is expected to already be a
//! parenthesised literal list and is written into the SQL text instead of
//! being bound. Any other spelling (`in`) is bound like a plain operator.
//! A negated clause renders as `<field> NOT <op> <placeholder>`.

mod builder;
pub mod helpers;

pub use builder::{QueryExecutor, Records, DEFAULT_PRIMARY_KEY};

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::db::{BoxError, Value};

/// Operator that splices its value into the SQL text.
pub const IN_OPERATOR: &str = "IN";

/// A single filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhereClause {
    pub field: String,
    pub operator: String,
    pub value: Value,
    pub negated: bool,
}

impl WhereClause {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
            negated: false,
        }
    }

    /// Same clause with the negation flag set.
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    /// Whether the value is spliced into the SQL rather than bound.
    pub fn is_in(&self) -> bool {
        self.operator == IN_OPERATOR
    }

    /// The operator as rendered, including the `NOT` prefix when negated.
    pub fn rendered_operator(&self) -> String {
        if self.negated {
            format!("NOT {}", self.operator)
        } else {
            self.operator.clone()
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            other => Err(format!("invalid sort direction '{}', expected ASC or DESC", other)),
        }
    }
}

/// A single ordering term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderClause {
    pub field: String,
    pub direction: Direction,
}

impl OrderClause {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// SELECT-shaped request against one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub table: String,
    /// Projected columns. `["*"]` unless narrowed with `select`.
    pub fields: Vec<String>,
    pub wheres: Vec<WhereClause>,
    pub orders: Vec<OrderClause>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Relation names marked for eager loading. Stored only.
    pub includes: Vec<String>,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: vec!["*".to_string()],
            wheres: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            includes: Vec::new(),
        }
    }

    /// Copy of this query projecting `COUNT(*)` with ordering and paging dropped.
    pub fn to_count(&self) -> Query {
        Query {
            table: self.table.clone(),
            fields: vec!["COUNT(*)".to_string()],
            wheres: self.wheres.clone(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            includes: self.includes.clone(),
        }
    }
}

/// SQL text plus positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Errors raised by terminal query operations.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("database not initialized")]
    NotInitialized,

    #[error("no rows found in '{table}'")]
    NoRows { table: String },

    #[error("query on '{table}' failed: {source}")]
    Execution {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to decode row from '{table}': {source}")]
    Decode {
        table: String,
        #[source]
        source: BoxError,
    },
}

impl QueryError {
    pub fn is_no_rows(&self) -> bool {
        matches!(self, QueryError::NoRows { .. })
    }
}
