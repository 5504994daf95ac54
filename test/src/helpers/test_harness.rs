use std::time::Instant;

use tinynet_client::{Client, ClientConfig};
use tinynet_server::{Server, ServerConfig};
use tinynet_shared::{ConnectionId, NetworkId, Protocol, Replicate, ReplicatedObject};

use crate::{exchange_packets, LocalNetwork};

/// One server and its clients, wired together through a [`LocalNetwork`]
pub struct TestHarness {
    pub network: LocalNetwork,
    pub server: Server,
    pub clients: Vec<(ConnectionId, Client)>,
    protocol: fn() -> Protocol,
    next_connection: u64,
    errors: Vec<String>,
}

impl TestHarness {
    pub fn new(protocol: fn() -> Protocol) -> Self {
        Self::with_config(ServerConfig::default(), protocol)
    }

    pub fn with_config(server_config: ServerConfig, protocol: fn() -> Protocol) -> Self {
        Self {
            network: LocalNetwork::new(),
            server: Server::new(server_config, protocol()),
            clients: Vec::new(),
            protocol,
            next_connection: 1,
            errors: Vec::new(),
        }
    }

    /// Connects a new client. Whatever the server sends on connect is left
    /// queued.
    pub fn add_client(&mut self) -> ConnectionId {
        let connection = ConnectionId::new(self.next_connection);
        self.next_connection += 1;

        self.network.add_client(connection);
        let mut sender = self.network.server_sender();
        if let Err(err) = self.server.connect(connection, &mut sender) {
            self.errors.push(format!("connect {}: {}", connection, err));
        }
        let client = Client::new(ClientConfig::default(), (self.protocol)());
        self.clients.push((connection, client));
        connection
    }

    pub fn remove_client(&mut self, connection: ConnectionId) {
        self.network.remove_client(connection);
        self.clients.retain(|(id, _)| *id != connection);
        if let Err(err) = self.server.disconnect(connection) {
            self.errors.push(format!("disconnect {}: {}", connection, err));
        }
    }

    pub fn client(&self, connection: ConnectionId) -> &Client {
        self.clients
            .iter()
            .find(|(id, _)| *id == connection)
            .map(|(_, client)| client)
            .unwrap_or_else(|| panic!("{} is not connected", connection))
    }

    pub fn client_mut(&mut self, connection: ConnectionId) -> &mut Client {
        self.clients
            .iter_mut()
            .find(|(id, _)| *id == connection)
            .map(|(_, client)| client)
            .unwrap_or_else(|| panic!("{} is not connected", connection))
    }

    /// Spawns an object on the server and its mirror on every client.
    /// `make` builds each instance; the server's one is built first.
    pub fn spawn<R: Replicate>(
        &mut self,
        owner: Option<ConnectionId>,
        mut make: impl FnMut() -> ReplicatedObject<R>,
    ) -> NetworkId {
        let mut sender = self.network.server_sender();
        let network_id = match self.server.spawn(make(), owner, &mut sender) {
            Ok(network_id) => network_id,
            Err(err) => panic!("spawn failed: {}", err),
        };
        for (connection, client) in self.clients.iter_mut() {
            let owned = owner == Some(*connection);
            if let Err(err) = client.spawn_remote(network_id, make(), owned) {
                self.errors.push(format!("spawn_remote on {}: {}", connection, err));
            }
        }
        network_id
    }

    /// Runs one server update, then delivers everything queued. Returns the
    /// number of state updates the server sent.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut sender = self.network.server_sender();
        let sent = self.server.update(now, &mut sender);
        for (_, client) in self.clients.iter_mut() {
            client.update(now);
        }
        self.exchange();
        sent
    }

    pub fn exchange(&mut self) -> usize {
        exchange_packets(&self.network, &mut self.server, &mut self.clients, &mut self.errors)
    }

    /// Errors collected since the last call
    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }
}
