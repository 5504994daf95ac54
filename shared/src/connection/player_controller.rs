use std::fmt;

use crate::types::ConnectionId;

/// Id of a local player on one connection. Several players may share a
/// connection.
pub type PlayerControllerId = i16;

/// One player on one connection. Lives exactly as long as its connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerController {
    id: PlayerControllerId,
    connection: ConnectionId,
}

impl PlayerController {
    pub const INVALID_ID: PlayerControllerId = -1;

    pub fn new(id: PlayerControllerId, connection: ConnectionId) -> Self {
        Self { id, connection }
    }

    pub fn id(&self) -> PlayerControllerId {
        self.id
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn is_valid(&self) -> bool {
        self.id != Self::INVALID_ID
    }
}

impl fmt::Display for PlayerController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerID={}", self.id)
    }
}
