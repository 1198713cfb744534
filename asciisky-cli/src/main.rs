//! Binary crate for the `asciisky` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Printing the report

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env_file(dotenv::dotenv())?;

    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);

    cmd.run().await
}

/// Initialize global tracing subscriber.
///
/// - Uses `RUST_LOG` if set (e.g. `RUST_LOG=asciisky=debug,asciisky_core=trace`)
/// - Otherwise `warn` for our crates, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "asciisky=debug,asciisky_core=debug"
    } else {
        "asciisky=warn,asciisky_core=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// A missing `.env` is fine; one that exists but can't be read or parsed is not.
fn load_env_file<T>(loaded: Result<T, dotenv::Error>) -> anyhow::Result<()> {
    match loaded {
        Err(e) if !e.not_found() => Err(e).context("Failed to load .env file"),
        _ => Ok(()),
    }
}
