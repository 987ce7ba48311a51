mod execute;
mod output;

use std::path::PathBuf;

use clap::Args;

use crate::dialect::Dialect;

pub use execute::{DdlError, DdlResult, TableDdl};

/// Print CREATE TABLE statements for a schema
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  comet ddl                            # DDL for ./schema in the configured dialect
  comet ddl schema/blog.cmt -d mysql   # MySQL DDL for one file
  comet ddl -d postgres -m User        # Only the User table")]
pub struct DdlCmd {
    /// Schema file or directory of .cmt files (defaults to the configured schema, then ./schema)
    pub path: Option<PathBuf>,

    /// Target dialect (defaults to the configured dialect, then the database URL)
    #[arg(short, long, value_enum)]
    pub dialect: Option<Dialect>,

    /// Only generate the table for this model
    #[arg(short, long)]
    pub model: Option<String>,
}
