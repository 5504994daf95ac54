pub mod error;
pub mod outgoing_queue;

use crate::types::ConnectionId;

pub use error::TransportError;

/// Delivery guarantee requested for one payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeliveryMode {
    /// May be lost, duplicated or reordered
    Unreliable,
    /// May be lost, stale payloads are dropped in favor of newer ones
    Sequenced,
    /// Always arrives, in any order
    ReliableUnordered,
    /// Always arrives, in send order
    ReliableOrdered,
}

/// Where a payload was addressed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    Server,
    Connection(ConnectionId),
    Observers,
}

/// The outgoing half of a transport, as seen by the replication core.
/// Payloads are complete packets, including the leading packet type.
pub trait PacketSender {
    fn send_to_server(&mut self, payload: &[u8], mode: DeliveryMode) -> Result<(), TransportError>;

    fn send_to_connection(
        &mut self,
        connection: ConnectionId,
        payload: &[u8],
        mode: DeliveryMode,
    ) -> Result<(), TransportError>;

    /// Sends to every connection observing the local peer's objects
    fn broadcast_to_observers(&mut self, payload: &[u8], mode: DeliveryMode) -> Result<(), TransportError>;

    fn send(
        &mut self,
        destination: Destination,
        payload: &[u8],
        mode: DeliveryMode,
    ) -> Result<(), TransportError> {
        match destination {
            Destination::Server => self.send_to_server(payload, mode),
            Destination::Connection(connection) => self.send_to_connection(connection, payload, mode),
            Destination::Observers => self.broadcast_to_observers(payload, mode),
        }
    }
}
