//! The adapter: consumes radio events, maintains state, and forwards
//! normalized text messages to an application-supplied sink.

use std::collections::HashMap;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::link::{Destination, EventStream, RadioEvent, RadioLink};
use crate::message::{self, InboundText};
use crate::state::{ClientState, LinkState, NodeRecord};

/// Application-level consumer of inbound text messages.
///
/// Called at most once per inbound text event, on the event-driving task,
/// with a handle back into the adapter for replies and registry lookups.
/// Event delivery is single-lane: a handler that blocks indefinitely stalls
/// every event behind it.
pub trait MessageSink<R: RadioLink> {
    async fn on_message(
        &mut self,
        message: InboundText,
        client: &mut ClientHandle<'_, R>,
    ) -> Result<()>;
}

/// What the event loop should do after a handled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// The adapter cannot make progress. The host should shut down and let
    /// a supervisor restart the process.
    Fatal,
}

/// Why [`Client::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The radio reported the link down.
    ConnectionLost,
    /// The driver dropped the event stream without a link-down event.
    EventStreamClosed,
}

/// The adapter reference handed to [`MessageSink::on_message`]: routed send
/// access plus read-only views of adapter state.
pub struct ClientHandle<'a, R: RadioLink> {
    link: &'a mut R,
    state: &'a ClientState,
}

impl<'a, R: RadioLink> ClientHandle<'a, R> {
    /// Send a text message through the routing policy
    /// ([`message::resolve_route`]).
    pub async fn send_text(
        &mut self,
        text: &str,
        channel: Option<u32>,
        destination: Option<Destination>,
    ) -> Result<()> {
        message::send_text_message(self.link, text, channel, destination).await
    }

    pub fn link_state(&self) -> LinkState {
        self.state.link
    }

    pub fn nodes(&self) -> &HashMap<u32, NodeRecord> {
        &self.state.nodes
    }

    pub fn self_node(&self) -> Option<&NodeRecord> {
        self.state.self_node.as_ref()
    }
}

/// A radio client wired to a message sink.
pub struct Client<R: RadioLink, S: MessageSink<R>> {
    link: R,
    sink: S,
    state: ClientState,
}

impl<R: RadioLink, S: MessageSink<R>> Client<R, S> {
    pub fn new(link: R, sink: S) -> Self {
        Self {
            link,
            sink,
            state: ClientState::new(),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// The underlying radio.
    pub fn link(&self) -> &R {
        &self.link
    }

    /// The wrapped message sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Send a text message through the routing policy from outside the
    /// event loop.
    pub async fn send_text(
        &mut self,
        text: &str,
        channel: Option<u32>,
        destination: Option<Destination>,
    ) -> Result<()> {
        message::send_text_message(&mut self.link, text, channel, destination).await
    }

    /// Drive the adapter until the link drops or the driver goes away.
    /// Handler errors (undecodable payloads, sink failures) propagate out
    /// uncaught.
    pub async fn run(&mut self, mut events: EventStream) -> Result<Shutdown> {
        while let Some(event) = events.recv().await {
            if self.handle_event(event).await? == Control::Fatal {
                return Ok(Shutdown::ConnectionLost);
            }
        }
        // The driver normally emits ConnectionLost before closing; a closed
        // stream without one still means the radio is gone.
        self.state.link = LinkState::Disconnected;
        warn!("Radio event stream closed");
        Ok(Shutdown::EventStreamClosed)
    }

    /// Dispatch one raw event to its handler.
    pub async fn handle_event(&mut self, event: RadioEvent) -> Result<Control> {
        match event {
            RadioEvent::Connected => Ok(self.handle_connected()),
            RadioEvent::ConnectionLost => Ok(self.handle_connection_lost()),
            RadioEvent::NodeUpdated(node) => Ok(self.handle_node_update(&node)),
            RadioEvent::TextReceived(packet) => self.handle_text(&packet).await,
        }
    }

    fn handle_connected(&mut self) -> Control {
        self.state.link = LinkState::Connected;
        info!("Connected to radio");
        Control::Continue
    }

    fn handle_connection_lost(&mut self) -> Control {
        self.state.link = LinkState::Disconnected;
        warn!("Lost connection to radio");
        Control::Fatal
    }

    fn handle_node_update(&mut self, node: &Value) -> Control {
        match NodeRecord::from_update(node) {
            Some(record) => {
                debug!("Node update for {:08x}", record.num);
                self.state.upsert_node(record);
            }
            // A node we cannot key is a node we cannot track.
            None => debug!("Ignoring node update without a node number"),
        }
        Control::Continue
    }

    async fn handle_text(&mut self, packet: &Value) -> Result<Control> {
        let message = InboundText::from_packet(packet)?;
        debug!(
            "Text message from {:?} on channel {:?}",
            message.from, message.channel
        );
        let mut handle = ClientHandle {
            link: &mut self.link,
            state: &self.state,
        };
        self.sink.on_message(message, &mut handle).await?;
        Ok(Control::Continue)
    }
}
