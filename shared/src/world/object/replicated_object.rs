use std::{
    any::Any,
    sync::Arc,
    time::{Duration, Instant},
};

use log::debug;

use tinynet_serde::{ByteReader, SerdeErr};

use crate::{
    messages::rpc::error::RpcError,
    types::{ConnectionId, NetworkId, RpcIndex},
    world::{
        object::{
            dirty_flags::DirtyFlags,
            error::AccessorError,
            net_object::NetObject,
            periodic_task::{PeriodicTask, PeriodicTasks, TaskHandle},
            property_accessor::PropertyAccessor,
            replicate::Replicate,
        },
        schema::{
            field_schema::FieldSchema, registry::SchemaRegistry, replicated_value::ReplicatedValue,
        },
    },
};

type RpcHandler<R> = Box<dyn FnMut(&mut R, &mut ByteReader<'_>) -> Result<(), SerdeErr>>;

/// The unit of replication: a [`Replicate`] value plus everything the
/// network layer tracks about it.
pub struct ReplicatedObject<R: Replicate> {
    inner: R,
    schema: Arc<FieldSchema>,
    network_id: Option<NetworkId>,
    owner: Option<ConnectionId>,
    has_authority: bool,
    accessors: Vec<PropertyAccessor>,
    dirty_flags: Option<DirtyFlags>,
    // allocated on first registration, sized to the declared RPC count
    rpc_handlers: Option<Vec<Option<RpcHandler<R>>>>,
    tasks: PeriodicTasks<R>,
    last_send_time: Option<Instant>,
    despawned: bool,
}

impl<R: Replicate> ReplicatedObject<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            schema: SchemaRegistry::resolve::<R>(),
            network_id: None,
            owner: None,
            has_authority: false,
            accessors: Vec::new(),
            dirty_flags: None,
            rpc_handlers: None,
            tasks: PeriodicTasks::new(),
            last_send_time: None,
            despawned: false,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    // RPC handlers

    /// Registers the handler for the RPC declared as `name`
    ///
    /// # Panics
    ///
    /// Panics if `R` does not declare an RPC named `name`.
    /// Consider using `try_register_rpc_handler` for non-panicking error handling.
    pub fn register_rpc_handler<F>(&mut self, name: &str, handler: F) -> RpcIndex
    where
        F: FnMut(&mut R, &mut ByteReader<'_>) -> Result<(), SerdeErr> + 'static,
    {
        self.try_register_rpc_handler(name, handler)
            .expect("register_rpc_handler called with an undeclared RPC name")
    }

    /// Registers the handler for the RPC declared as `name`, replacing any
    /// previous one. Returns the RPC's index.
    pub fn try_register_rpc_handler<F>(&mut self, name: &str, handler: F) -> Result<RpcIndex, RpcError>
    where
        F: FnMut(&mut R, &mut ByteReader<'_>) -> Result<(), SerdeErr> + 'static,
    {
        let index = self.schema.rpc_index(name)?;
        let rpc_count = self.schema.rpc_count();
        let handlers = self
            .rpc_handlers
            .get_or_insert_with(|| (0..rpc_count).map(|_| None).collect());
        handlers[index as usize] = Some(Box::new(handler));
        Ok(index)
    }

    pub fn has_rpc_handler(&self, index: RpcIndex) -> bool {
        self.rpc_handlers
            .as_ref()
            .and_then(|handlers| handlers.get(index as usize))
            .is_some_and(Option::is_some)
    }

    /// Whether the handler table has been allocated yet
    pub fn rpc_table_allocated(&self) -> bool {
        self.rpc_handlers.is_some()
    }

    // Periodic tasks

    /// Runs `callback` every `interval` from the owning peer's update pass,
    /// until stopped or until this object despawns
    pub fn add_periodic_task<F>(&mut self, interval: Duration, callback: F) -> TaskHandle
    where
        F: FnMut(&mut R) + 'static,
    {
        self.tasks.add(PeriodicTask::new(interval, callback))
    }

    /// Returns false if the task was already stopped
    pub fn stop_periodic_task(&mut self, handle: TaskHandle) -> bool {
        self.tasks.stop(handle)
    }

    pub fn is_task_running(&self, handle: TaskHandle) -> bool {
        self.tasks.get(handle).is_some_and(PeriodicTask::is_running)
    }

    pub fn running_task_count(&self) -> usize {
        self.tasks.running_count()
    }

    fn out_of_range(&self, index: usize) -> AccessorError {
        AccessorError::FieldOutOfRange {
            type_name: self.schema.type_name(),
            index,
            field_count: self.schema.field_count(),
        }
    }

    fn accessor(&self, index: usize) -> Result<&PropertyAccessor, AccessorError> {
        if self.accessors.is_empty() && self.schema.field_count() > 0 {
            return Err(AccessorError::Unbound {
                type_name: self.schema.type_name(),
            });
        }
        self.accessors.get(index).ok_or_else(|| self.out_of_range(index))
    }
}

impl<R: Replicate> NetObject for ReplicatedObject<R> {
    fn network_id(&self) -> Option<NetworkId> {
        self.network_id
    }

    fn receive_network_id(&mut self, network_id: NetworkId) {
        self.network_id = Some(network_id);
    }

    fn schema(&self) -> &Arc<FieldSchema> {
        &self.schema
    }

    fn owner(&self) -> Option<ConnectionId> {
        self.owner
    }

    fn has_authority(&self) -> bool {
        self.has_authority
    }

    fn set_ownership(&mut self, owner: Option<ConnectionId>, has_authority: bool) {
        self.owner = owner;
        self.has_authority = has_authority;
    }

    fn on_network_create(&mut self) -> Result<(), AccessorError> {
        self.accessors = PropertyAccessor::for_all_fields(&self.schema, &self.inner)?;
        self.dirty_flags = self.schema.dirty_width().map(DirtyFlags::new);
        self.despawned = false;
        Ok(())
    }

    fn despawn(&mut self) {
        debug!(
            "despawning {} {:?}, stopping {} periodic tasks",
            self.schema.type_name(),
            self.network_id,
            self.tasks.running_count()
        );
        self.tasks.stop_all();
        self.accessors.clear();
        self.dirty_flags = None;
        self.rpc_handlers = None;
        self.network_id = None;
        self.despawned = true;
    }

    fn is_despawned(&self) -> bool {
        self.despawned
    }

    fn run_periodic(&mut self, now: Instant) -> usize {
        if self.despawned {
            return 0;
        }
        self.tasks.poll_all(now, &mut self.inner)
    }

    fn dirty_flags(&self) -> Option<&DirtyFlags> {
        self.dirty_flags.as_ref()
    }

    fn clear_dirty_flags(&mut self) {
        if let Some(flags) = self.dirty_flags.as_mut() {
            flags.clear();
        }
    }

    fn set_dirty_flag(&mut self, index: usize, dirty: bool) {
        if let Some(flags) = self.dirty_flags.as_mut() {
            flags.set_bit(index, dirty);
        }
    }

    fn field_changed(&mut self, index: usize) -> bool {
        let Some(accessor) = self.accessors.get_mut(index) else {
            return false;
        };
        accessor.changed(&self.inner)
    }

    fn field_value(&self, index: usize) -> Result<ReplicatedValue, AccessorError> {
        self.accessor(index)?.get(&self.inner)
    }

    fn apply_field(&mut self, index: usize, value: ReplicatedValue) -> Result<(), AccessorError> {
        if self.accessors.is_empty() && self.schema.field_count() > 0 {
            return Err(AccessorError::Unbound {
                type_name: self.schema.type_name(),
            });
        }
        let Some(accessor) = self.accessors.get(index) else {
            return Err(self.out_of_range(index));
        };
        accessor.set(&mut self.inner, value)
    }

    fn mark_sent(&mut self, now: Instant) {
        self.last_send_time = Some(now);
    }

    fn last_send_time(&self) -> Option<Instant> {
        self.last_send_time
    }

    fn invoke_rpc(&mut self, index: RpcIndex, reader: &mut ByteReader) -> Result<(), RpcError> {
        let type_name = self.schema.type_name();
        let Some(decl) = self.schema.rpc(index) else {
            return Err(RpcError::IndexOutOfRange {
                type_name,
                index,
                rpc_count: self.schema.rpc_count(),
            });
        };
        let name = decl.name;

        let Some(handler) = self
            .rpc_handlers
            .as_mut()
            .and_then(|handlers| handlers.get_mut(index as usize))
            .and_then(Option::as_mut)
        else {
            return Err(RpcError::UnregisteredHandler {
                type_name,
                name,
                index,
            });
        };

        handler(&mut self.inner, reader).map_err(|source| RpcError::HandlerFailed {
            type_name,
            name,
            source,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
