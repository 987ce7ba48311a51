use clap::Parser;
use tracing::Level;

use comet::cli::Args;
use comet::config::ConfigFile;

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = ConfigFile::load()?.unwrap_or_default();
    let output = args.command.run(&config, args.format)?;
    println!("{}", output);
    Ok(())
}
