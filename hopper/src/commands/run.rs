use anyhow::{Result, bail};
use chrono::Local;
use colored::*;
use hopper_core::client::{Client, ClientHandle, MessageSink, Shutdown};
use hopper_core::connection::RadioConnection;
use hopper_core::link::{EventStream, RadioLink};
use hopper_core::message::InboundText;

use crate::output::{OutputFormat, print_error, print_info, print_warning};

/// Prints every inbound message to stdout, one line per message.
struct PrintSink {
    format: OutputFormat,
}

impl<R: RadioLink> MessageSink<R> for PrintSink {
    async fn on_message(
        &mut self,
        message: InboundText,
        _client: &mut ClientHandle<'_, R>,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{json}", json = serde_json::to_string(&message)?);
            }
            OutputFormat::Text => {
                let timestamp = Local::now().format("%H:%M:%S");
                let from = message
                    .from
                    .map(|num| format!("{num:08x}"))
                    .unwrap_or_else(|| "unknown".to_string());
                println!(
                    "{stamp} {from} [{channel}]: {text}",
                    stamp = format!("[{timestamp}]").dimmed(),
                    from = from.blue().bold(),
                    channel = message.channel.unwrap_or(0),
                    text = message.text
                );
            }
        }
        Ok(())
    }
}

pub async fn handle_run(
    connection: RadioConnection,
    events: EventStream,
    format: OutputFormat,
) -> Result<()> {
    print_info("Listening for messages... Press Ctrl+C to stop");

    let mut client = Client::new(connection, PrintSink { format });

    // Both shutdown reasons are failures: the process exits nonzero and a
    // supervisor brings it back with a fresh connection.
    match client.run(events).await? {
        Shutdown::ConnectionLost => {
            print_error("Lost connection to radio");
            bail!("connection to radio lost")
        }
        Shutdown::EventStreamClosed => {
            print_warning("Radio event stream closed unexpectedly");
            bail!("radio event stream closed")
        }
    }
}
