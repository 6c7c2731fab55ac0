//! Outbound notification delivery to connected clients.

use crate::protocol::ServerEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Opaque identifier of one live connection.
pub type ConnectionId = String;

/// Capacity of each connection's outbound queue.
const OUTBOUND_QUEUE: usize = 32;

/// Registry of live connections and their outbound channels.
///
/// Delivery is fire-and-forget: a message for a connection that is gone, or
/// whose queue is full, is dropped. A dead connection will shortly produce
/// its own disconnect event, which performs the real cleanup.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<Mutex<HashMap<ConnectionId, mpsc::Sender<String>>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and returns the receiving end of its queue.
    ///
    /// The caller owns the receiver and drains it into the socket. A second
    /// registration under the same id replaces the first.
    pub fn register(&self, id: ConnectionId) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE);
        let mut connections = self.connections.lock().expect("registry lock poisoned");
        if connections.insert(id.clone(), tx).is_some() {
            warn!(connection_id = %id, "replaced an existing connection registration");
        }
        rx
    }

    /// Removes a connection. Messages to it are dropped from then on.
    pub fn remove(&self, id: &str) {
        let mut connections = self.connections.lock().expect("registry lock poisoned");
        let _ = connections.remove(id);
    }

    /// Serializes an event and queues it for one connection.
    ///
    /// Returns `false` when the target is gone or its queue is full; the
    /// message is dropped in both cases.
    pub fn send(&self, id: &str, event: &ServerEvent) -> bool {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(error) => {
                warn!(%error, "failed to serialize server event");
                return false;
            }
        };
        let connections = self.connections.lock().expect("registry lock poisoned");
        match connections.get(id) {
            Some(tx) => {
                if tx.try_send(json).is_ok() {
                    true
                } else {
                    warn!(connection_id = %id, "dropping notification for unreachable connection");
                    false
                }
            }
            None => {
                debug!(connection_id = %id, "notification target is no longer connected");
                false
            }
        }
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().expect("registry lock poisoned").len()
    }
}
