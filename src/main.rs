use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bylines::cli;

fn main() -> Result<()> {
    // Parse args first so --log-level can seed the filter
    let cli = cli::Cli::parse();

    // Initialize logging; RUST_LOG overrides --log-level. Diagnostics go to
    // stderr so machine-readable stdout stays clean.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .init();

    cli::run(cli)
}
