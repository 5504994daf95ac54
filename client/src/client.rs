use std::{collections::HashMap, time::Instant};

use log::{debug, info, warn};

use tinynet_shared::{
    ByteReader, NetContext, NetObject, NetworkId, PacketSender, PacketType, Protocol, Replicate,
    ReplicatedObject, RpcError, RpcHeader, RpcRouter, RpcSendOutcome, RpcTarget, StateHeader,
    StateSynchronizer, SyncKind,
};

use crate::{error::ClientError, world::PendingFirstSyncs, ClientConfig};

/// A peer that mirrors server-replicated objects. The NetworkId of every
/// object is assigned by the server; the client only ever receives state.
pub struct Client {
    config: ClientConfig,
    protocol: Protocol,
    syncer: StateSynchronizer,
    router: RpcRouter,
    objects: HashMap<NetworkId, Box<dyn NetObject>>,
    pending_first_syncs: PendingFirstSyncs,
}

impl Client {
    /// Create a new Client. The protocol is locked.
    pub fn new<P: Into<Protocol>>(client_config: ClientConfig, protocol: P) -> Self {
        let mut protocol: Protocol = protocol.into();
        if !protocol.is_locked() {
            protocol.lock();
        }
        let context = NetContext::client();

        Self {
            syncer: StateSynchronizer::new(context),
            router: RpcRouter::new(context).with_delivery(protocol.rpc_delivery),
            objects: HashMap::new(),
            pending_first_syncs: PendingFirstSyncs::new(client_config.max_buffered_first_syncs),
            config: client_config,
            protocol,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    // Objects

    /// Binds `object` to the NetworkId the server assigned it. `owned`
    /// grants this client authority over the object. A full state that
    /// arrived before the spawn is applied right away.
    pub fn spawn_remote<R: Replicate>(
        &mut self,
        network_id: NetworkId,
        mut object: ReplicatedObject<R>,
        owned: bool,
    ) -> Result<(), ClientError> {
        if self.objects.contains_key(&network_id) {
            return Err(ClientError::AlreadySpawned { network_id });
        }
        object.on_network_create()?;
        object.receive_network_id(network_id);
        object.set_ownership(None, owned);

        if let Some(message) = self.pending_first_syncs.take(&network_id) {
            if let Err(err) = self.syncer.decode(&mut object, &message) {
                warn!("Client: buffered state of {} could not be applied: {}", network_id, err);
            }
        }
        info!("Client: spawned {} as {}", object.type_name(), network_id);
        self.objects.insert(network_id, Box::new(object));
        Ok(())
    }

    pub fn despawn_remote(&mut self, network_id: NetworkId) -> Result<Box<dyn NetObject>, ClientError> {
        let Some(mut object) = self.objects.remove(&network_id) else {
            return Err(ClientError::UnknownObject { network_id });
        };
        object.despawn();
        info!("Client: despawned {}", network_id);
        Ok(object)
    }

    /// Grants or revokes this client's authority over an object
    pub fn set_authority(&mut self, network_id: NetworkId, owned: bool) -> Result<(), ClientError> {
        let object = self
            .objects
            .get_mut(&network_id)
            .ok_or(ClientError::UnknownObject { network_id })?;
        object.set_ownership(None, owned);
        Ok(())
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

    pub fn has_object(&self, network_id: NetworkId) -> bool {
        self.objects.contains_key(&network_id)
    }

    pub fn objects_count(&self) -> usize {
        self.objects.len()
    }

    pub fn buffered_first_syncs(&self) -> usize {
        self.pending_first_syncs.len()
    }

    // Update

    /// Runs the periodic tasks of every object. Returns how many ran.
    pub fn update(&mut self, now: Instant) -> usize {
        self.objects
            .values_mut()
            .map(|object| object.run_periodic(now))
            .sum()
    }

    // RPC

    pub fn send_rpc(
        &self,
        network_id: NetworkId,
        name: &str,
        args: &[u8],
        sender: &mut dyn PacketSender,
    ) -> Result<RpcSendOutcome, ClientError> {
        let object = self
            .objects
            .get(&network_id)
            .ok_or(ClientError::UnknownObject { network_id })?;
        Ok(self.router.send_rpc(object.as_ref(), name, args, sender)?)
    }

    // Incoming

    /// Handles one payload received from the server. A rejected payload is
    /// logged and dropped.
    pub fn receive(&mut self, payload: &[u8]) -> Result<(), ClientError> {
        self.read_payload(payload)
            .inspect_err(|err| warn!("Client: dropped payload: {}", err))
    }

    fn read_payload(&mut self, payload: &[u8]) -> Result<(), ClientError> {
        let mut reader = ByteReader::new(payload);
        match PacketType::read(&mut reader)? {
            PacketType::StateUpdate => self.receive_state(reader.read_to_end()),
            PacketType::Rpc => self.receive_rpc(reader.read_to_end()),
        }
    }

    fn receive_state(&mut self, message: &[u8]) -> Result<(), ClientError> {
        let header = StateHeader::read(&mut ByteReader::new(message))?;
        let network_id = header.network_id;

        let Some(object) = self.objects.get_mut(&network_id) else {
            match header.kind {
                SyncKind::FirstSync if self.config.buffer_early_first_sync => {
                    debug!("Client: buffering state of {} until it is spawned", network_id);
                    self.pending_first_syncs.insert(network_id, message);
                }
                _ => warn!("Client: dropping {:?} state for unknown {}", header.kind, network_id),
            }
            return Ok(());
        };

        self.syncer.decode(object.as_mut(), message)?;
        Ok(())
    }

    fn receive_rpc(&mut self, message: &[u8]) -> Result<(), ClientError> {
        let header = RpcHeader::read(&mut ByteReader::new(message))?;
        let network_id = header.network_id;
        let object = self
            .objects
            .get_mut(&network_id)
            .ok_or(ClientError::UnknownObject { network_id })?;

        let schema = object.schema().clone();
        let Some(decl) = schema.rpc(header.rpc_index) else {
            return Err(RpcError::IndexOutOfRange {
                type_name: schema.type_name(),
                index: header.rpc_index,
                rpc_count: schema.rpc_count(),
            }
            .into());
        };
        if decl.target == RpcTarget::Server {
            return Err(ClientError::RpcTargetRejected {
                network_id,
                name: decl.name,
            });
        }

        self.router.try_receive_rpc(object.as_mut(), message)?;
        Ok(())
    }
}
