//! Newest Feed command-line entry point.
//!
//! Runs one scrape, validates the result, and writes the JSON envelope.
//! Logs go to stderr so stdout carries only the response.

use std::error::Error;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use newest_feed::cli::{Cli, execute};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let outcome = execute(&args).await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    outcome.map_err(Into::into)
}
