//! Inbound text normalization and outbound routing.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::extract;
use crate::link::{Destination, RadioLink};

/// A text payload that was present but undecodable. Kept distinct from
/// transport errors because defaulting here would be indistinguishable from
/// a legitimately empty message; only a genuinely absent payload defaults.
#[derive(Debug, Error)]
pub enum TextDecodeError {
    #[error("text payload is not valid UTF-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
    /// The payload field exists but is not byte-shaped.
    #[error("text payload is not a byte string")]
    NotBytes,
}

/// A normalized inbound text message. Fields the packet did not carry are
/// `None` rather than invented values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InboundText {
    /// Node number of the sender.
    pub from: Option<u32>,
    /// Channel index the message arrived on.
    pub channel: Option<u32>,
    /// Radio-assigned packet ID, usable for reply threading.
    pub rx_id: Option<u32>,
    pub text: String,
}

impl InboundText {
    /// Normalize a raw text packet. Missing fields default silently; a
    /// payload that is present but not decodable is an error.
    pub fn from_packet(packet: &Value) -> Result<Self, TextDecodeError> {
        let payload = match extract::value_at(packet, &["decoded", "payload"]) {
            None => Vec::new(),
            Some(value) => extract::as_bytes(value).ok_or(TextDecodeError::NotBytes)?,
        };
        Ok(Self {
            from: extract::u32_at(packet, &["from"]),
            channel: extract::u32_at(packet, &["channel"]),
            rx_id: extract::u32_at(packet, &["id"]),
            text: String::from_utf8(payload)?,
        })
    }
}

/// Resolve the effective channel index and destination for an outbound send.
///
/// An explicitly supplied destination collapses to broadcast, and so does
/// any send with an explicit channel; only when both are unset does no
/// destination survive. The channel index defaults to the primary channel.
// TODO: confirm with the bot owners whether an explicit node destination
// should really collapse to broadcast. Shipped deployments rely on every
// send being a broadcast, so the rule is pinned by tests until then.
pub fn resolve_route(
    channel: Option<u32>,
    destination: Option<Destination>,
) -> (u32, Option<Destination>) {
    let destination = destination.map(|_| Destination::Broadcast);
    let destination = match channel {
        None => destination,
        Some(_) => Some(Destination::Broadcast),
    };
    (channel.unwrap_or(0), destination)
}

/// Send a text message through the routing policy. Acknowledgment and
/// response flags are always off; radio errors propagate unchanged.
pub async fn send_text_message<R: RadioLink>(
    link: &mut R,
    text: &str,
    channel: Option<u32>,
    destination: Option<Destination>,
) -> Result<()> {
    let (channel, destination) = resolve_route(channel, destination);
    let destination =
        destination.context("No destination resolved: destination and channel are both unset")?;
    link.send_text(text, channel, destination, false, false)
        .await?;
    debug!("Text message routed to {destination:?} on channel {channel}");
    Ok(())
}
