//! Meshtastic-backed radio driver.
//!
//! Owns the stream API connection and a pump task that translates raw
//! `FromRadio` frames into [`RadioEvent`]s. Everything protocol-specific
//! stays on this side of the [`RadioLink`] seam.

use anyhow::{Context, Result};
use meshtastic::api::state::Configured;
use meshtastic::api::{ConnectedStreamApi, StreamApi};
use meshtastic::packet::{PacketDestination, PacketReceiver, PacketRouter};
use meshtastic::protobufs;
use meshtastic::utils;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::link::{Destination, EventStream, RadioEvent, RadioLink};

/// A simple packet router that doesn't handle incoming packets; inbound
/// traffic is consumed by the pump task instead.
struct NoOpRouter;

impl PacketRouter<(), std::io::Error> for NoOpRouter {
    fn handle_packet_from_radio(
        &mut self,
        _packet: protobufs::FromRadio,
    ) -> std::result::Result<(), std::io::Error> {
        Ok(())
    }

    fn handle_mesh_packet(
        &mut self,
        _packet: protobufs::MeshPacket,
    ) -> std::result::Result<(), std::io::Error> {
        Ok(())
    }

    fn source_node_id(&self) -> meshtastic::types::NodeId {
        0u32.into()
    }
}

/// An established, configured link to a Meshtastic radio.
pub struct RadioConnection {
    api: ConnectedStreamApi<Configured>,
    pump: JoinHandle<()>,
}

/// Connect to a radio and start pumping its frames as [`RadioEvent`]s.
///
/// A target containing `:` is treated as a TCP address, anything else as a
/// serial port; with no target the first detected serial port is used.
pub async fn connect(target: Option<&str>) -> Result<(RadioConnection, EventStream)> {
    let stream_api = StreamApi::new();

    let (packet_receiver, connected_api) = if let Some(target) = target {
        if target.contains(':') {
            info!("Connecting via TCP to {target}");
            let stream = utils::stream::build_tcp_stream(target.to_owned())
                .await
                .context("Failed to connect via TCP")?;
            stream_api.connect(stream).await
        } else {
            info!("Connecting via serial port {target}");
            // Default baud rate, DTR, and RTS
            let stream = utils::stream::build_serial_stream(target.to_owned(), None, None, None)
                .context("Failed to connect via serial")?;
            stream_api.connect(stream).await
        }
    } else {
        info!("No target given, scanning serial ports");
        let ports =
            utils::stream::available_serial_ports().context("Failed to list serial ports")?;
        let port_name = ports
            .first()
            .cloned()
            .context("No serial ports detected; pass a port explicitly")?;
        info!("Using detected port {port_name}");

        let stream = utils::stream::build_serial_stream(port_name, None, None, None)
            .context("Failed to connect to detected serial port")?;
        stream_api.connect(stream).await
    };

    let config_id = utils::generate_rand_id();
    let api = connected_api
        .configure(config_id)
        .await
        .context("Failed to configure connection")?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let pump = tokio::spawn(pump_events(packet_receiver, events_tx));

    Ok((RadioConnection { api, pump }, events_rx))
}

impl RadioConnection {
    /// Tear the link down and stop the pump.
    pub async fn disconnect(self) -> Result<()> {
        self.pump.abort();
        self.api.disconnect().await?;
        Ok(())
    }
}

impl RadioLink for RadioConnection {
    async fn send_text(
        &mut self,
        text: &str,
        channel: u32,
        destination: Destination,
        want_ack: bool,
        want_response: bool,
    ) -> Result<()> {
        let packet_destination = match destination {
            Destination::Broadcast => PacketDestination::Broadcast,
            Destination::Node(num) => PacketDestination::Node(num.into()),
        };

        let mut router = NoOpRouter;
        self.api
            .send_mesh_packet(
                &mut router,
                text.as_bytes().to_vec().into(),
                protobufs::PortNum::TextMessageApp,
                packet_destination,
                channel.into(),
                want_ack,
                want_response,
                false, // echo_response
                None,  // reply_id
                None,  // emoji
            )
            .await?;

        debug!("Text message sent to {destination:?} on channel {channel}");
        Ok(())
    }
}

/// Forward radio frames to the adapter until the radio goes away.
///
/// The connection-established event is emitted once here, after the stream
/// API is configured, so consumers see it only when the radio is actually
/// usable. A closed frame stream emits the link-down event before ending.
async fn pump_events(mut receiver: PacketReceiver, events: mpsc::UnboundedSender<RadioEvent>) {
    if events.send(RadioEvent::Connected).is_err() {
        return;
    }

    while let Some(from_radio) = receiver.recv().await {
        if let Some(event) = translate_from_radio(from_radio)
            && events.send(event).is_err()
        {
            // Consumer dropped its end; nobody is listening anymore.
            return;
        }
    }

    let _ = events.send(RadioEvent::ConnectionLost);
}

/// Map a raw frame onto an adapter event. Frames the adapter does not
/// subscribe to yield `None`.
pub(crate) fn translate_from_radio(from_radio: protobufs::FromRadio) -> Option<RadioEvent> {
    match from_radio.payload_variant? {
        protobufs::from_radio::PayloadVariant::NodeInfo(node_info) => {
            Some(RadioEvent::NodeUpdated(node_value(node_info)))
        }
        protobufs::from_radio::PayloadVariant::Packet(mesh_packet) => {
            translate_mesh_packet(mesh_packet)
        }
        _ => None,
    }
}

fn translate_mesh_packet(mesh_packet: protobufs::MeshPacket) -> Option<RadioEvent> {
    let data = match mesh_packet.payload_variant? {
        protobufs::mesh_packet::PayloadVariant::Decoded(data) => data,
        // Can't process encrypted packets
        protobufs::mesh_packet::PayloadVariant::Encrypted(_) => return None,
    };

    if data.portnum() != protobufs::PortNum::TextMessageApp {
        return None;
    }

    Some(RadioEvent::TextReceived(json!({
        "from": mesh_packet.from,
        "to": mesh_packet.to,
        "id": mesh_packet.id,
        "channel": mesh_packet.channel,
        "rxTime": mesh_packet.rx_time,
        "rxSnr": mesh_packet.rx_snr,
        "hopLimit": mesh_packet.hop_limit,
        "decoded": {
            "portnum": data.portnum().as_str_name(),
            "payload": data.payload,
        },
    })))
}

fn node_value(node_info: protobufs::NodeInfo) -> Value {
    let user = node_info.user.unwrap_or_default();
    json!({
        "num": node_info.num,
        "user": {
            "id": user.id,
            "longName": user.long_name,
            "shortName": user.short_name,
            "hwModel": format!("{:?}", user.hw_model()),
        },
        "snr": node_info.snr,
        "lastHeard": node_info.last_heard,
    })
}
