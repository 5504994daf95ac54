use std::default::Default;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// NetworkId handed to the first spawned object. Later spawns count up
    /// from here.
    pub first_network_id: u32,
    /// Maximum number of player controllers on a single connection
    pub max_player_controllers: usize,
    /// Whether a newly connected client is sent the full state of every
    /// live object
    pub first_sync_on_connect: bool,
    /// Whether an RPC's declared caller is checked against the sending
    /// connection. When off, any connected client may call any RPC that
    /// targets the server.
    pub enforce_rpc_caller: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            first_network_id: 1,
            max_player_controllers: 4,
            first_sync_on_connect: true,
            enforce_rpc_caller: false,
        }
    }
}
