//! Fan-out of device messages to connected clients.
//!
//! # Ordering (for beginners)
//!
//! A client reads frames strictly left to right with no resynchronization
//! marker, so every connection must receive its frames in the exact order the
//! events were produced, with no gaps.  The hub guarantees this by giving
//! each connection:
//!
//! - one bounded FIFO queue (`tokio::sync::mpsc`), and
//! - exactly one writer task draining that queue onto the socket.
//!
//! Producers never touch a socket.  They call [`EventHub::publish`], which
//! builds the [`DeviceMessage`] once and shares it, behind an `Arc`, with
//! every queue.
//!
//! If a client is too slow and its queue fills up, the hub drops that client
//! instead of skipping a frame; a skipped frame would leave the client
//! decoding garbage.

use std::collections::HashMap;
use std::sync::Arc;

use mirror_core::DeviceMessage;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::events::{produce, DeviceEvent};

/// Default per-connection queue depth.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// Registry of the outbound queues of all live connections.
pub struct EventHub {
    connections: Mutex<HashMap<Uuid, mpsc::Sender<Arc<DeviceMessage>>>>,
    capacity: usize,
}

impl EventHub {
    /// Creates an empty hub whose per-connection queues hold `capacity`
    /// messages (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Registers a new connection.
    ///
    /// Returns the session id and the receiving end of its queue; the caller's
    /// writer task must be the only consumer.
    pub async fn register(&self) -> (Uuid, mpsc::Receiver<Arc<DeviceMessage>>) {
        let (tx, rx) = mpsc::channel(self.capacity);
        let id = Uuid::new_v4();
        self.connections.lock().await.insert(id, tx);
        debug!("session {id}: registered outbound queue");
        (id, rx)
    }

    /// Removes a connection.  Its writer sees the queue close once drained.
    pub async fn unregister(&self, id: Uuid) {
        if self.connections.lock().await.remove(&id).is_some() {
            debug!("session {id}: unregistered outbound queue");
        }
    }

    /// Number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }

    /// Produces the wire message for `event` and queues it for every client.
    ///
    /// Returns the number of clients the message was queued for.
    pub async fn publish(&self, event: DeviceEvent) -> usize {
        self.publish_message(produce(event)).await
    }

    /// Queues an already built message for every client.
    ///
    /// Clients whose queue is full or closed are removed from the hub.
    pub async fn publish_message(&self, msg: DeviceMessage) -> usize {
        let msg = Arc::new(msg);
        let mut connections = self.connections.lock().await;
        let mut delivered = 0;
        connections.retain(|id, tx| match tx.try_send(Arc::clone(&msg)) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("session {id}: outbound queue full; dropping client to keep framing intact");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("session {id}: writer gone; removing");
                false
            }
        });
        delivered
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(DEFAULT_OUTBOUND_CAPACITY)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
