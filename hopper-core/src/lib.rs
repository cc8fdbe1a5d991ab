//! Core library for hopper, a Meshtastic bot adapter.
//!
//! This crate bridges a Meshtastic mesh radio to an application-level
//! message handler. It keeps a connection to the radio, normalizes the
//! radio's raw events into a small typed contract, and routes outbound
//! text messages back through the same link.

// Async trait methods are only consumed inside this workspace.
#![allow(async_fn_in_trait)]

pub mod client;
pub mod connection;
pub mod extract;
pub mod link;
pub mod message;
pub mod state;

// Re-export commonly used types
pub use anyhow::Result;
pub use client::{Client, ClientHandle, Control, MessageSink, Shutdown};
pub use connection::RadioConnection;
pub use link::{BROADCAST_NUM, Destination, EventStream, RadioEvent, RadioLink};
pub use message::{InboundText, TextDecodeError};
pub use state::{ClientState, LinkState, NodeRecord};
