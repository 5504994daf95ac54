use log::{debug, error, warn};

use tinynet_serde::{ByteReader, ByteWriter};

use crate::{
    connection::packet_type::PacketType,
    messages::rpc::{
        error::RpcError,
        rpc_message::{write_rpc_message, RpcHeader},
        rpc_target::RpcTarget,
    },
    transport::{DeliveryMode, Destination, PacketSender},
    types::{ConnectionId, NetContext, RpcIndex},
    world::object::net_object::NetObject,
};

/// What happened to an outgoing RPC
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RpcSendOutcome {
    /// Handed to the transport
    Sent(Destination),
    /// The routing policy says this peer should not send it
    Suppressed,
    /// The object cannot send RPCs right now, the reason was logged
    Dropped,
}

/// Decides whether & where RPCs go, and dispatches received RPCs to their
/// handlers.
///
/// | target      | suppressed when                               | sent to         |
/// |-------------|-----------------------------------------------|-----------------|
/// | ClientOwner | caller is a client, or caller holds authority | owning client   |
/// | Server      | caller is the server                          | server          |
/// | Everyone    | caller is a client                            | every observer  |
pub struct RpcRouter {
    context: NetContext,
    delivery: DeliveryMode,
}

impl RpcRouter {
    pub fn new(context: NetContext) -> Self {
        Self {
            context,
            delivery: DeliveryMode::ReliableOrdered,
        }
    }

    pub fn with_delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn context(&self) -> &NetContext {
        &self.context
    }

    pub fn delivery(&self) -> DeliveryMode {
        self.delivery
    }

    pub fn is_suppressed(&self, target: RpcTarget, has_authority: bool) -> bool {
        let is_server = self.context.is_server();
        match target {
            RpcTarget::ClientOwner => !is_server || has_authority,
            RpcTarget::Server => is_server,
            RpcTarget::Everyone => !is_server,
        }
    }

    /// Where an RPC with `target` goes from this peer, or None if suppressed
    pub fn destination(
        &self,
        target: RpcTarget,
        has_authority: bool,
        owner: Option<ConnectionId>,
    ) -> Option<Destination> {
        if self.is_suppressed(target, has_authority) {
            return None;
        }
        match target {
            RpcTarget::Server => Some(Destination::Server),
            RpcTarget::Everyone => Some(Destination::Observers),
            RpcTarget::ClientOwner => match owner {
                Some(connection) => Some(Destination::Connection(connection)),
                None => {
                    warn!("RpcRouter: ClientOwner RPC on an object the server does not hold authority over, but which has no owner");
                    None
                }
            },
        }
    }

    // Send

    /// Sends the RPC declared as `name` on the object's type, with `args` as
    /// the raw argument bytes
    pub fn send_rpc(
        &self,
        object: &dyn NetObject,
        name: &str,
        args: &[u8],
        sender: &mut dyn PacketSender,
    ) -> Result<RpcSendOutcome, RpcError> {
        let index = object.schema().rpc_index(name)?;
        self.send_rpc_index(object, index, args, sender)
    }

    pub fn send_rpc_index(
        &self,
        object: &dyn NetObject,
        index: RpcIndex,
        args: &[u8],
        sender: &mut dyn PacketSender,
    ) -> Result<RpcSendOutcome, RpcError> {
        let schema = object.schema();
        let Some(decl) = schema.rpc(index) else {
            return Err(RpcError::IndexOutOfRange {
                type_name: schema.type_name(),
                index,
                rpc_count: schema.rpc_count(),
            });
        };
        let Some(network_id) = object.network_id() else {
            error!(
                "RpcRouter::send_rpc(type={}, rpc={}): {}",
                schema.type_name(),
                decl.name,
                RpcError::MissingIdentity {
                    type_name: schema.type_name()
                }
            );
            return Ok(RpcSendOutcome::Dropped);
        };

        let Some(destination) = self.destination(decl.target, object.has_authority(), object.owner())
        else {
            debug!(
                "RpcRouter::send_rpc(id={}, rpc={}) suppressed for target {:?}",
                network_id, decl.name, decl.target
            );
            return Ok(RpcSendOutcome::Suppressed);
        };

        let mut writer = ByteWriter::with_capacity(7 + args.len());
        PacketType::Rpc.write(&mut writer);
        write_rpc_message(&mut writer, &RpcHeader::new(network_id, index), args);
        sender.send(destination, writer.as_slice(), self.delivery)?;

        Ok(RpcSendOutcome::Sent(destination))
    }

    // Receive

    /// Invokes the handler for a received RPC message
    /// (`[objectId][rpcIndex][args]`, without the packet type). Returns
    /// false if the call was dropped, the reason is logged.
    pub fn receive_rpc(&self, object: &mut dyn NetObject, message: &[u8]) -> bool {
        match self.try_receive_rpc(object, message) {
            Ok(()) => true,
            Err(err @ RpcError::UnregisteredHandler { .. }) => {
                warn!("RpcRouter::receive_rpc: {}, call dropped", err);
                false
            }
            Err(err) => {
                error!("RpcRouter::receive_rpc: {}", err);
                false
            }
        }
    }

    pub fn try_receive_rpc(&self, object: &mut dyn NetObject, message: &[u8]) -> Result<(), RpcError> {
        let mut reader = ByteReader::new(message);
        let header = RpcHeader::read(&mut reader)?;
        let Some(expected) = object.network_id() else {
            return Err(RpcError::MissingIdentity {
                type_name: object.type_name(),
            });
        };
        if expected != header.network_id {
            return Err(RpcError::NetworkIdMismatch {
                expected,
                found: header.network_id,
            });
        }
        object.invoke_rpc(header.rpc_index, &mut reader)
    }
}
