mod run;
mod send;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::output::OutputFormat;

pub async fn handle_command(cli: Cli) -> Result<()> {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Every command starts from a connected, configured radio.
    let (connection, events) = hopper_core::connection::connect(cli.port.as_deref()).await?;

    match cli.command {
        Commands::Run => run::handle_run(connection, events, format).await,
        Commands::Send {
            text,
            dest,
            channel,
        } => send::handle_send(connection, text, dest, channel, format).await,
    }
}
