mod execute;
mod output;

use std::path::PathBuf;

use clap::Args;

pub use execute::ParseResult;

/// Parse schema files and print the model IR
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  comet parse                        # Parse every .cmt file under ./schema
  comet parse schema/blog.cmt        # Parse a single file
  comet parse models/ --format json  # Dump the IR as JSON")]
pub struct ParseCmd {
    /// Schema file or directory of .cmt files (defaults to the configured schema, then ./schema)
    pub path: Option<PathBuf>,
}
