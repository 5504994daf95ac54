use std::{
    collections::{BTreeMap, HashMap},
    time::Instant,
};

use log::{debug, info, warn};

use tinynet_shared::{
    ByteReader, ByteWriter, ConnectionId, NetContext, NetObject, NetworkId, PacketSender,
    PacketType, PlayerController, PlayerControllerId, Protocol, Replicate, ReplicatedObject,
    RpcCaller, RpcError, RpcHeader, RpcRouter, RpcSendOutcome, RpcTarget, StateSynchronizer,
    SyncError, SyncKind, Timer,
};

use crate::{connection::Connection, error::ServerError, ServerConfig};

/// The authoritative peer. Assigns NetworkIds, owns every replicated
/// object and is the only peer that tracks dirty state.
pub struct Server {
    config: ServerConfig,
    protocol: Protocol,
    syncer: StateSynchronizer,
    router: RpcRouter,
    replication_timer: Timer,
    objects: BTreeMap<NetworkId, Box<dyn NetObject>>,
    connections: HashMap<ConnectionId, Connection>,
    // None once every id has been handed out
    next_network_id: Option<u32>,
}

impl Server {
    /// Create a new Server. The protocol is locked.
    pub fn new<P: Into<Protocol>>(server_config: ServerConfig, protocol: P) -> Self {
        let mut protocol: Protocol = protocol.into();
        if !protocol.is_locked() {
            protocol.lock();
        }
        let context = NetContext::server();

        Self {
            syncer: StateSynchronizer::new(context),
            router: RpcRouter::new(context).with_delivery(protocol.rpc_delivery),
            replication_timer: Timer::new(protocol.replication_interval),
            objects: BTreeMap::new(),
            connections: HashMap::new(),
            next_network_id: Some(server_config.first_network_id),
            config: server_config,
            protocol,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    // Connections

    /// Registers a connected client. Unless disabled in the config, the
    /// client is sent the full state of every live object.
    pub fn connect(&mut self, connection: ConnectionId, sender: &mut dyn PacketSender) -> Result<(), ServerError> {
        if self.connections.contains_key(&connection) {
            return Err(ServerError::AlreadyConnected { connection });
        }
        self.connections.insert(connection, Connection::new(connection));
        info!("Server: {} connected", connection);

        if !self.config.first_sync_on_connect {
            return Ok(());
        }
        for object in self.objects.values() {
            let Some(packet) = encode_state_packet(&self.syncer, object.as_ref(), SyncKind::FirstSync) else {
                continue;
            };
            if let Err(err) = sender.send_to_connection(connection, &packet, self.protocol.first_sync_delivery) {
                warn!("Server: first sync of {:?} to {} failed: {}", object.network_id(), connection, err);
            }
        }
        Ok(())
    }

    /// Removes a connection along with its player controllers. Objects it
    /// owned fall back to server authority.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Result<Vec<PlayerController>, ServerError> {
        let Some(mut record) = self.connections.remove(&connection) else {
            return Err(ServerError::UnknownConnection { connection });
        };
        for object in self.objects.values_mut() {
            if object.owner() == Some(connection) {
                object.set_ownership(None, true);
            }
        }
        info!("Server: {} disconnected", connection);
        Ok(record.take_player_controllers())
    }

    pub fn is_connected(&self, connection: ConnectionId) -> bool {
        self.connections.contains_key(&connection)
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connections_count(&self) -> usize {
        self.connections.len()
    }

    // Player controllers

    pub fn add_player_controller(
        &mut self,
        connection: ConnectionId,
        id: PlayerControllerId,
    ) -> Result<PlayerController, ServerError> {
        let max = self.config.max_player_controllers;
        let record = self.connection_mut(connection)?;
        let controller = record.add_player_controller(id, max)?;
        debug!("Server: added {} on {}", controller, connection);
        Ok(controller)
    }

    pub fn remove_player_controller(
        &mut self,
        connection: ConnectionId,
        id: PlayerControllerId,
    ) -> Result<Option<PlayerController>, ServerError> {
        Ok(self.connection_mut(connection)?.remove_player_controller(id))
    }

    pub fn player_controllers(&self, connection: ConnectionId) -> Result<&[PlayerController], ServerError> {
        self.connections
            .get(&connection)
            .map(Connection::player_controllers)
            .ok_or(ServerError::UnknownConnection { connection })
    }

    fn connection_mut(&mut self, connection: ConnectionId) -> Result<&mut Connection, ServerError> {
        self.connections
            .get_mut(&connection)
            .ok_or(ServerError::UnknownConnection { connection })
    }

    // Objects

    /// Assigns a NetworkId to `object`, binds its accessors and sends its
    /// full state to every observer. With an `owner`, authority over the
    /// object is delegated to that connection.
    pub fn spawn<R: Replicate>(
        &mut self,
        mut object: ReplicatedObject<R>,
        owner: Option<ConnectionId>,
        sender: &mut dyn PacketSender,
    ) -> Result<NetworkId, ServerError> {
        if let Some(connection) = owner {
            if !self.connections.contains_key(&connection) {
                return Err(ServerError::UnknownConnection { connection });
            }
        }
        let Some(value) = self.next_network_id else {
            return Err(ServerError::NetworkIdsExhausted);
        };
        object.on_network_create()?;

        let network_id = NetworkId::new(value);
        self.next_network_id = value.checked_add(1);
        object.receive_network_id(network_id);
        object.set_ownership(owner, owner.is_none());
        info!(
            "Server: spawned {} as {}, owner {:?}",
            object.type_name(),
            network_id,
            owner
        );

        if let Some(packet) = encode_state_packet(&self.syncer, &object, SyncKind::FirstSync) {
            if let Err(err) = sender.broadcast_to_observers(&packet, self.protocol.first_sync_delivery) {
                warn!("Server: first sync of {} failed: {}", network_id, err);
            }
        }
        self.objects.insert(network_id, Box::new(object));
        Ok(network_id)
    }

    /// Removes an object, releasing its accessors, dirty flags, RPC handlers
    /// and periodic tasks
    pub fn despawn(&mut self, network_id: NetworkId) -> Result<Box<dyn NetObject>, ServerError> {
        let Some(mut object) = self.objects.remove(&network_id) else {
            return Err(ServerError::UnknownObject { network_id });
        };
        object.despawn();
        info!("Server: despawned {}", network_id);
        Ok(object)
    }

    pub fn object<R: Replicate>(&self, network_id: NetworkId) -> Option<&ReplicatedObject<R>> {
        self.objects
            .get(&network_id)?
            .as_any()
            .downcast_ref::<ReplicatedObject<R>>()
    }

    pub fn object_mut<R: Replicate>(&mut self, network_id: NetworkId) -> Option<&mut ReplicatedObject<R>> {
        self.objects
            .get_mut(&network_id)?
            .as_any_mut()
            .downcast_mut::<ReplicatedObject<R>>()
    }

    pub fn net_object(&self, network_id: NetworkId) -> Option<&dyn NetObject> {
        self.objects.get(&network_id).map(|object| &**object)
    }

    pub fn network_ids(&self) -> impl Iterator<Item = NetworkId> + '_ {
        self.objects.keys().copied()
    }

    pub fn objects_count(&self) -> usize {
        self.objects.len()
    }

    // Update

    /// Runs periodic tasks, and once per replication interval ticks every
    /// object and broadcasts a delta for each dirty one. Returns the number
    /// of state updates sent.
    pub fn update(&mut self, now: Instant, sender: &mut dyn PacketSender) -> usize {
        for object in self.objects.values_mut() {
            object.run_periodic(now);
        }

        if !self.replication_timer.ring_and_reset(now) {
            return 0;
        }

        let mut sent = 0;
        for object in self.objects.values_mut() {
            if !self.syncer.tick(object.as_mut(), now) {
                continue;
            }
            let Some(packet) = encode_state_packet(&self.syncer, object.as_ref(), SyncKind::Delta) else {
                continue;
            };
            match sender.broadcast_to_observers(&packet, self.protocol.state_delivery) {
                Ok(()) => sent += 1,
                Err(err) => warn!("Server: state update of {:?} failed: {}", object.network_id(), err),
            }
        }
        sent
    }

    // RPC

    pub fn send_rpc(
        &self,
        network_id: NetworkId,
        name: &str,
        args: &[u8],
        sender: &mut dyn PacketSender,
    ) -> Result<RpcSendOutcome, ServerError> {
        let object = self
            .objects
            .get(&network_id)
            .ok_or(ServerError::UnknownObject { network_id })?;
        Ok(self.router.send_rpc(object.as_ref(), name, args, sender)?)
    }

    /// Handles one payload received from `connection`. Only RPCs that
    /// target the server are dispatched. With
    /// [`ServerConfig::enforce_rpc_caller`] set, the connection must also
    /// match the RPC's declared caller. A rejected payload is logged and
    /// dropped.
    pub fn receive(&mut self, connection: ConnectionId, payload: &[u8]) -> Result<(), ServerError> {
        self.read_payload(connection, payload)
            .inspect_err(|err| warn!("Server: dropped payload from {}: {}", connection, err))
    }

    fn read_payload(&mut self, connection: ConnectionId, payload: &[u8]) -> Result<(), ServerError> {
        if !self.connections.contains_key(&connection) {
            return Err(ServerError::UnknownConnection { connection });
        }

        let mut reader = ByteReader::new(payload);
        match PacketType::read(&mut reader)? {
            PacketType::StateUpdate => Err(ServerError::StateFromClient { connection }),
            PacketType::Rpc => {
                let message = reader.read_to_end();
                let header = RpcHeader::read(&mut ByteReader::new(message))?;
                let network_id = header.network_id;
                let object = self
                    .objects
                    .get_mut(&network_id)
                    .ok_or(ServerError::UnknownObject { network_id })?;

                let schema = object.schema().clone();
                let Some(decl) = schema.rpc(header.rpc_index) else {
                    return Err(RpcError::IndexOutOfRange {
                        type_name: schema.type_name(),
                        index: header.rpc_index,
                        rpc_count: schema.rpc_count(),
                    }
                    .into());
                };
                if decl.target != RpcTarget::Server {
                    return Err(ServerError::RpcTargetRejected {
                        connection,
                        network_id,
                        name: decl.name,
                    });
                }
                let allowed = match decl.caller {
                    RpcCaller::Anyone => true,
                    RpcCaller::ClientOwner => object.owner() == Some(connection),
                    RpcCaller::Server => false,
                };
                if self.config.enforce_rpc_caller && !allowed {
                    return Err(ServerError::RpcCallerRejected {
                        connection,
                        network_id,
                        name: decl.name,
                    });
                }

                self.router.try_receive_rpc(object.as_mut(), message)?;
                Ok(())
            }
        }
    }
}

fn encode_state_packet(syncer: &StateSynchronizer, object: &dyn NetObject, kind: SyncKind) -> Option<Vec<u8>> {
    let mut writer = ByteWriter::new();
    PacketType::StateUpdate.write(&mut writer);
    match syncer.write_state(object, kind, &mut writer) {
        Ok(()) => Some(writer.to_bytes()),
        // reported once, when the schema was resolved
        Err(SyncError::TrackingDisabled { .. }) => None,
        Err(err) => {
            warn!("Server: cannot encode state: {}", err);
            None
        }
    }
}
