//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - An `Execute` impl producing a serialisable result
//! - An `Outputable` impl for the table format

mod compile;
mod ddl;
mod migrate;
mod parse;

pub use compile::{CompileCmd, CompileResult, Filter, Membership};
pub use ddl::{DdlCmd, DdlError, DdlResult, TableDdl};
pub use migrate::{MigrateCmd, MigrateResult};
pub use parse::{ParseCmd, ParseResult};

use clap::Subcommand;
use std::error::Error;
use std::path::{Path, PathBuf};

use crate::config::ConfigFile;
use crate::db::DatabaseConfig;
use crate::dialect::Dialect;
use crate::output::{OutputFormat, Outputable};
use crate::schema::{load_schema, Schema};

/// Schema location used when neither the command line nor `.comet.json` names one.
pub const DEFAULT_SCHEMA_DIR: &str = "schema";

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>>;
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse schema files and print the model IR
    Parse(ParseCmd),

    /// Print CREATE TABLE statements for a schema
    Ddl(DdlCmd),

    /// Compile a query against one table and print the SQL and arguments
    Compile(CompileCmd),

    /// Apply a schema to the database (--dry-run previews the DDL)
    Migrate(MigrateCmd),

    /// Catch-all for unknown commands
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, config: &ConfigFile, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Parse(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Ddl(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Compile(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Migrate(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Unknown(args) => {
                Err(format!("Unknown command: {}", args.first().unwrap_or(&String::new())).into())
            }
        }
    }
}

/// Schema path from the flag, then the config file, then `./schema`.
pub(crate) fn schema_path(arg: Option<&Path>, config: &ConfigFile) -> PathBuf {
    arg.map(Path::to_path_buf)
        .or_else(|| config.schema.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_DIR))
}

/// Load the schema a command operates on.
pub(crate) fn load_command_schema(
    arg: Option<&Path>,
    config: &ConfigFile,
) -> Result<(PathBuf, Schema), Box<dyn Error>> {
    let path = schema_path(arg, config);
    let schema = load_schema(&path)?;
    Ok((path, schema))
}

/// Dialect from the flag, then the config file, then the resolved database URL.
pub(crate) fn target_dialect(arg: Option<Dialect>, config: &ConfigFile) -> Dialect {
    arg.or(config.dialect).unwrap_or_else(|| {
        DatabaseConfig::resolve_from(Some(config), DatabaseConfig::from_env()).dialect
    })
}
