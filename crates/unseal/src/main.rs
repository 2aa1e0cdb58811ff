//! Unseal - decrypt PGP-encrypted S3 objects
//!
//! Runs under the Lambda runtime by default; `unseal run` processes the
//! source prefix once from a shell.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Run(args)) => commands::run::run(args).await,
        Some(Commands::Lambda) | None => commands::lambda::run().await,
    }
}

/// Initialize tracing with appropriate verbosity
///
/// `RUST_LOG` wins when set and no verbosity flag was given.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
