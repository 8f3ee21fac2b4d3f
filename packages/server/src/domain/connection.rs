//! Outbound side of a live socket, as seen by the registry.

use tokio::sync::mpsc::{self, error::TrySendError};

use super::{error::DeliveryError, value_object::ConnectionId};

/// Handle to a connected client's outbox.
///
/// The outbox is a bounded channel drained by the connection's writer task.
/// Delivery never waits: a full outbox means the peer is too slow and the
/// payload is dropped for that peer only.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbox: mpsc::Sender<String>,
}

impl ConnectionHandle {
    /// Wrap an outbox sender under a fresh connection id.
    pub fn new(outbox: mpsc::Sender<String>) -> Self {
        Self {
            id: ConnectionId::generate(),
            outbox,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue an encoded message without blocking.
    pub fn deliver(&self, payload: String) -> Result<(), DeliveryError> {
        self.outbox.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Queue an encoded message, waiting for outbox capacity.
    ///
    /// Only used for replies on the connection's own control loop, never while
    /// a registry lock is held.
    pub async fn reply(&self, payload: String) -> Result<(), DeliveryError> {
        self.outbox
            .send(payload)
            .await
            .map_err(|_| DeliveryError::Closed)
    }
}
