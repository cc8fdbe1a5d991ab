//! The capability contract between the adapter and a mesh radio: a stream
//! of discrete events in, a single text-send operation out.

use serde_json::Value;
use tokio::sync::mpsc;

/// Wire sentinel for "deliver to all reachable nodes".
pub const BROADCAST_NUM: u32 = 0xffff_ffff;

/// A raw event emitted by the radio driver.
///
/// Node and packet payloads are loosely-typed mappings whose shape varies by
/// packet type; consumers read them through [`crate::extract`] rather than
/// indexing directly.
#[derive(Debug, Clone)]
pub enum RadioEvent {
    /// The link is up and the stream API is configured.
    Connected,
    /// The link went down. Terminal: the adapter does not reconnect.
    ConnectionLost,
    /// A node's metadata was reported or changed.
    NodeUpdated(Value),
    /// A decoded text packet arrived.
    TextReceived(Value),
}

/// Events are delivered over an unbounded channel so the radio's reader
/// task never blocks on a slow consumer.
pub type EventStream = mpsc::UnboundedReceiver<RadioEvent>;

/// Where an outbound packet is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// All reachable nodes ([`BROADCAST_NUM`] on the wire).
    Broadcast,
    /// One specific node.
    Node(u32),
}

impl Destination {
    /// Map a raw node number onto a destination, folding the broadcast
    /// sentinel into [`Destination::Broadcast`].
    pub fn from_node_num(num: u32) -> Self {
        if num == BROADCAST_NUM {
            Self::Broadcast
        } else {
            Self::Node(num)
        }
    }
}

/// Send side of the radio. Implemented by the meshtastic-backed
/// [`crate::connection::RadioConnection`] and by test doubles.
pub trait RadioLink {
    /// Send a text packet. Errors from the radio propagate to the caller
    /// unchanged; there is no retry.
    async fn send_text(
        &mut self,
        text: &str,
        channel: u32,
        destination: Destination,
        want_ack: bool,
        want_response: bool,
    ) -> anyhow::Result<()>;
}
