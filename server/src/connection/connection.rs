use tinynet_shared::{ConnectionId, PlayerController, PlayerControllerId};

use crate::error::ServerError;

/// Server-side record of one connected client
pub struct Connection {
    id: ConnectionId,
    player_controllers: Vec<PlayerController>,
}

impl Connection {
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            player_controllers: Vec::new(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn player_controllers(&self) -> &[PlayerController] {
        &self.player_controllers
    }

    pub fn player_controller(&self, id: PlayerControllerId) -> Option<&PlayerController> {
        self.player_controllers
            .iter()
            .find(|controller| controller.id() == id)
    }

    pub(crate) fn add_player_controller(
        &mut self,
        id: PlayerControllerId,
        max: usize,
    ) -> Result<PlayerController, ServerError> {
        let controller = PlayerController::new(id, self.id);
        if !controller.is_valid() {
            return Err(ServerError::InvalidPlayerController {
                connection: self.id,
                id,
            });
        }
        if self.player_controller(id).is_some() {
            return Err(ServerError::DuplicatePlayerController {
                connection: self.id,
                id,
            });
        }
        if self.player_controllers.len() >= max {
            return Err(ServerError::TooManyPlayerControllers {
                connection: self.id,
                max,
            });
        }
        self.player_controllers.push(controller);
        Ok(controller)
    }

    pub(crate) fn remove_player_controller(&mut self, id: PlayerControllerId) -> Option<PlayerController> {
        let position = self
            .player_controllers
            .iter()
            .position(|controller| controller.id() == id)?;
        Some(self.player_controllers.remove(position))
    }

    pub(crate) fn take_player_controllers(&mut self) -> Vec<PlayerController> {
        std::mem::take(&mut self.player_controllers)
    }
}
