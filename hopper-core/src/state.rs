//! Adapter-owned state: link lifecycle and the node registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use crate::extract;

/// Link lifecycle as the adapter sees it. There is no reconnecting state:
/// losing the link is terminal and a supervisor is expected to restart the
/// process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connected,
}

/// Last-known metadata for a mesh node, extracted leniently from a raw
/// node-update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub num: u32,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub snr: Option<f64>,
    pub last_heard: Option<u64>,
}

impl NodeRecord {
    /// Build a record from a raw node payload. The node number is the
    /// registry key and therefore required; every other field is optional.
    pub fn from_update(node: &Value) -> Option<Self> {
        Some(Self {
            num: extract::u32_at(node, &["num"])?,
            long_name: extract::str_at(node, &["user", "longName"]).map(str::to_owned),
            short_name: extract::str_at(node, &["user", "shortName"]).map(str::to_owned),
            snr: extract::f64_at(node, &["snr"]),
            last_heard: extract::u64_at(node, &["lastHeard"]),
        })
    }
}

/// State owned by the adapter and mutated only by the event-driving task.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    pub link: LinkState,
    /// Node registry keyed by node number. Updates replace whole records.
    pub nodes: HashMap<u32, NodeRecord>,
    /// The local radio's own identity. None of the subscribed events
    /// populates it today; it is kept so handlers have one place to look
    /// once the driver starts reporting it.
    pub self_node: Option<NodeRecord>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the registry entry for `record.num`.
    pub fn upsert_node(&mut self, record: NodeRecord) {
        self.nodes.insert(record.num, record);
    }

    pub fn node(&self, num: u32) -> Option<&NodeRecord> {
        self.nodes.get(&num)
    }
}
