use std::{any::Any, sync::Arc, time::Instant};

use tinynet_serde::ByteReader;

use crate::{
    messages::rpc::error::RpcError,
    types::{ConnectionId, NetworkId, RpcIndex},
    world::{
        object::{dirty_flags::DirtyFlags, error::AccessorError},
        schema::{field_schema::FieldSchema, replicated_value::ReplicatedValue},
    },
};

/// Type-erased view of a [`ReplicatedObject`](super::replicated_object::ReplicatedObject),
/// which is what the state synchronizer, the RPC router and both peers work
/// with.
pub trait NetObject: Any {
    // Identity & ownership

    fn network_id(&self) -> Option<NetworkId>;
    fn receive_network_id(&mut self, network_id: NetworkId);
    fn schema(&self) -> &Arc<FieldSchema>;
    fn type_name(&self) -> &'static str {
        self.schema().type_name()
    }
    /// The client connection this object was delegated to, if any
    fn owner(&self) -> Option<ConnectionId>;
    fn has_authority(&self) -> bool;
    fn set_ownership(&mut self, owner: Option<ConnectionId>, has_authority: bool);

    // Lifecycle

    /// Binds accessors & dirty flags once the object is known to the network
    fn on_network_create(&mut self) -> Result<(), AccessorError>;
    /// Releases accessors, dirty flags, RPC handlers & stops periodic tasks
    fn despawn(&mut self);
    fn is_despawned(&self) -> bool;
    fn run_periodic(&mut self, now: Instant) -> usize;

    // Dirty tracking

    fn dirty_flags(&self) -> Option<&DirtyFlags>;
    fn is_dirty(&self) -> bool {
        self.dirty_flags().is_some_and(|flags| !flags.is_clear())
    }
    fn clear_dirty_flags(&mut self);
    fn set_dirty_flag(&mut self, index: usize, dirty: bool);
    /// Compares field `index` against its last observed value, see
    /// [`PropertyAccessor::changed`](super::property_accessor::PropertyAccessor::changed)
    fn field_changed(&mut self, index: usize) -> bool;
    fn field_value(&self, index: usize) -> Result<ReplicatedValue, AccessorError>;
    fn apply_field(&mut self, index: usize, value: ReplicatedValue) -> Result<(), AccessorError>;
    fn mark_sent(&mut self, now: Instant);
    fn last_send_time(&self) -> Option<Instant>;

    // RPC

    fn invoke_rpc(&mut self, index: RpcIndex, reader: &mut ByteReader) -> Result<(), RpcError>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
