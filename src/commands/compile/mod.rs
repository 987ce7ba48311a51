mod execute;
mod output;

use clap::Args;

use crate::db::Value;
use crate::dialect::Dialect;
use crate::query::{Direction, OrderClause};

pub use execute::CompileResult;

/// Compile a query against one table and print the SQL and arguments
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  comet compile -t users                                   # SELECT * FROM users
  comet compile -t users -s id,email -w age:>:18 -d postgres
  comet compile -t posts --where-not status:=:archived -o created_at:desc -l 10
  comet compile -t users --where-in id:1,2,3               # IN group is spliced, not bound

Filters are applied in the order: --where, --where-not, --where-in.")]
pub struct CompileCmd {
    /// Table to query
    #[arg(short, long)]
    pub table: String,

    /// Columns to project, comma-separated (default: *)
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Filter as field:operator:value (repeatable)
    #[arg(short = 'w', long = "where", value_parser = parse_filter)]
    pub filters: Vec<Filter>,

    /// Negated filter as field:operator:value (repeatable)
    #[arg(long = "where-not", value_parser = parse_filter)]
    pub negated: Vec<Filter>,

    /// Membership filter as field:v1,v2,... (repeatable)
    #[arg(long = "where-in", value_parser = parse_membership)]
    pub memberships: Vec<Membership>,

    /// Ordering as field or field:asc|desc (repeatable)
    #[arg(short, long = "order", value_parser = parse_order)]
    pub order: Vec<OrderClause>,

    /// Maximum number of rows
    #[arg(short, long)]
    pub limit: Option<u64>,

    /// Rows to skip
    #[arg(long)]
    pub offset: Option<u64>,

    /// Target dialect (defaults to the configured dialect, then the database URL)
    #[arg(short, long, value_enum)]
    pub dialect: Option<Dialect>,
}

/// A `field:operator:value` filter from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

/// A `field:v1,v2,...` membership filter from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    pub field: String,
    pub values: Vec<Value>,
}

fn parse_filter(raw: &str) -> Result<Filter, String> {
    let mut parts = raw.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(field), Some(operator), Some(value)) if !field.is_empty() && !operator.is_empty() => {
            Ok(Filter {
                field: field.to_string(),
                operator: operator.to_string(),
                value: parse_value(value),
            })
        }
        _ => Err(format!("expected field:operator:value, got '{}'", raw)),
    }
}

fn parse_membership(raw: &str) -> Result<Membership, String> {
    match raw.split_once(':') {
        Some((field, list)) if !field.is_empty() && !list.is_empty() => Ok(Membership {
            field: field.to_string(),
            values: list.split(',').map(parse_value).collect(),
        }),
        _ => Err(format!("expected field:v1,v2,..., got '{}'", raw)),
    }
}

fn parse_order(raw: &str) -> Result<OrderClause, String> {
    match raw.split_once(':') {
        Some((field, dir)) if !field.is_empty() => Ok(OrderClause::new(field, dir.parse::<Direction>()?)),
        Some(_) => Err(format!("expected field or field:direction, got '{}'", raw)),
        None if raw.is_empty() => Err("order field must not be empty".to_string()),
        None => Ok(OrderClause::new(raw, Direction::Asc)),
    }
}

/// Interpret a command-line literal: `null`, booleans, integers and floats
/// are typed; anything else is text, with one layer of matching quotes removed.
pub(crate) fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if let Ok(b) = raw.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if raw.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float(f);
        }
    }
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| raw.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)));
    Value::Text(unquoted.unwrap_or(raw).to_string())
}
