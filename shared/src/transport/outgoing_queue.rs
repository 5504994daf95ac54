use std::{collections::VecDeque, mem};

use crate::{
    transport::{DeliveryMode, Destination, PacketSender, TransportError},
    types::ConnectionId,
};

/// One payload waiting in an [`OutgoingQueue`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingPacket {
    pub destination: Destination,
    pub payload: Box<[u8]>,
    pub mode: DeliveryMode,
}

/// A [`PacketSender`] that records everything it is given, for a caller to
/// drain into a real socket later. Never fails.
#[derive(Default)]
pub struct OutgoingQueue {
    packets: VecDeque<OutgoingPacket>,
}

impl OutgoingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn pop(&mut self) -> Option<OutgoingPacket> {
        self.packets.pop_front()
    }

    /// Takes every queued packet, oldest first
    pub fn drain(&mut self) -> Vec<OutgoingPacket> {
        mem::take(&mut self.packets).into()
    }

    fn push(&mut self, destination: Destination, payload: &[u8], mode: DeliveryMode) {
        self.packets.push_back(OutgoingPacket {
            destination,
            payload: payload.into(),
            mode,
        });
    }
}

impl PacketSender for OutgoingQueue {
    fn send_to_server(&mut self, payload: &[u8], mode: DeliveryMode) -> Result<(), TransportError> {
        self.push(Destination::Server, payload, mode);
        Ok(())
    }

    fn send_to_connection(
        &mut self,
        connection: ConnectionId,
        payload: &[u8],
        mode: DeliveryMode,
    ) -> Result<(), TransportError> {
        self.push(Destination::Connection(connection), payload, mode);
        Ok(())
    }

    fn broadcast_to_observers(&mut self, payload: &[u8], mode: DeliveryMode) -> Result<(), TransportError> {
        self.push(Destination::Observers, payload, mode);
        Ok(())
    }
}
