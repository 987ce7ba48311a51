mod execute;
mod output;

use std::path::PathBuf;

use clap::Args;

use crate::dialect::Dialect;

pub use execute::MigrateResult;

/// Apply a schema to the database (--dry-run previews the DDL)
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  comet migrate --dry-run                  # Preview DDL for ./schema
  comet migrate schema/ -d mysql --dry-run # Preview MySQL DDL")]
pub struct MigrateCmd {
    /// Schema file or directory of .cmt files (defaults to the configured schema, then ./schema)
    pub path: Option<PathBuf>,

    /// Target dialect (defaults to the configured dialect, then the database URL)
    #[arg(short, long, value_enum)]
    pub dialect: Option<Dialect>,

    /// Print the statements that would run without touching the database
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
