//! CLI entry point for the parallelogram tile map tool

use clap::Parser;
use paratile::io::cli::Cli;

fn main() -> paratile::Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    cli.run()
}
