use anyhow::Result;
use hopper_core::connection::RadioConnection;
use hopper_core::link::Destination;
use serde::Serialize;

use crate::output::{OutputFormat, print_json, print_success};

#[derive(Debug, Serialize)]
struct SentMessage {
    text: String,
    destination: String,
    channel: u32,
}

/// An omitted destination means broadcast, matching the radio library's own
/// default. Only a caller going through the routed core API can express a
/// destination-less send.
fn requested_destination(dest: Option<u32>) -> Destination {
    dest.map_or(Destination::Broadcast, Destination::from_node_num)
}

pub async fn handle_send(
    mut connection: RadioConnection,
    text: String,
    dest: Option<u32>,
    channel: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    let destination = Some(requested_destination(dest));
    hopper_core::message::send_text_message(&mut connection, &text, channel, destination).await?;

    // Report what went out on the wire, not what was asked for; the routing
    // policy may widen a node destination to a broadcast.
    let (channel, resolved) = hopper_core::message::resolve_route(channel, destination);
    let sent = SentMessage {
        destination: match resolved {
            Some(Destination::Node(num)) => format!("{num:08x}"),
            _ => "Broadcast".to_string(),
        },
        channel,
        text,
    };

    match format {
        OutputFormat::Json => print_json(&sent),
        OutputFormat::Text => print_success(&format!(
            "Message sent to {destination} on channel {channel}",
            destination = sent.destination,
            channel = sent.channel
        )),
    }

    connection.disconnect().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use hopper_core::link::Destination;
    use hopper_core::message::resolve_route;

    use super::requested_destination;

    #[test]
    fn test_omitted_dest_broadcasts_on_primary_channel() -> Result<()> {
        // `hopper send -m hi` with neither --dest nor --channel
        let destination = Some(requested_destination(None));
        assert_eq!(destination, Some(Destination::Broadcast));
        assert_eq!(
            resolve_route(None, destination),
            (0, Some(Destination::Broadcast))
        );
        Ok(())
    }

    #[test]
    fn test_explicit_dest_maps_onto_node_number() -> Result<()> {
        assert_eq!(requested_destination(Some(7)), Destination::Node(7));
        assert_eq!(
            requested_destination(Some(0xffff_ffff)),
            Destination::Broadcast
        );
        Ok(())
    }
}
