//! CLI entry point for generating, drawing and checking maze corpora

use clap::Parser;
use mazecorpus::io::cli::{Cli, CommandRunner};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> mazecorpus::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    CommandRunner::new(cli).run()
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { Level::INFO } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
