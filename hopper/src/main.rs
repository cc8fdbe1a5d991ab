mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::Cli;
use crate::commands::handle_command;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.verbose);
    handle_command(cli).await
}

/// Verbosity comes from the flags unless RUST_LOG overrides it. Target and
/// thread decorations stay off so log lines read cleanly next to message
/// output on stderr.
fn init_tracing(debug: bool, verbose: bool) {
    let default_level = match (debug, verbose) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();
}
