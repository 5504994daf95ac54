use std::{sync::Arc, time::Duration};

use crate::{
    transport::DeliveryMode,
    world::{
        object::replicate::Replicate,
        schema::{field_schema::FieldSchema, registry::SchemaRegistry},
    },
};

pub mod error;
pub use error::ProtocolError;

// Protocol Plugin
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut Protocol);
}

/// A replicated type registered up front
#[derive(Clone, Debug)]
pub struct RegisteredType {
    pub schema: Arc<FieldSchema>,
}

impl RegisteredType {
    pub fn name(&self) -> &'static str {
        self.schema.type_name()
    }

    pub fn fingerprint(&self) -> u64 {
        self.schema.fingerprint()
    }
}

// Protocol
pub struct Protocol {
    /// Minimum time between two replication ticks on the server
    pub replication_interval: Duration,
    /// Delivery used for delta state updates
    pub state_delivery: DeliveryMode,
    /// Delivery used for the full state sent when an object is first seen
    pub first_sync_delivery: DeliveryMode,
    /// Delivery used for RPCs
    pub rpc_delivery: DeliveryMode,
    replicated_types: Vec<RegisteredType>,
    locked: bool,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            replication_interval: Duration::from_millis(50),
            state_delivery: DeliveryMode::Sequenced,
            first_sync_delivery: DeliveryMode::ReliableOrdered,
            rpc_delivery: DeliveryMode::ReliableOrdered,
            replicated_types: Vec::new(),
            locked: false,
        }
    }
}

impl From<&mut Protocol> for Protocol {
    fn from(protocol: &mut Protocol) -> Self {
        protocol.build()
    }
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> &mut Self {
        self.check_lock();
        plugin.build(self);
        self
    }

    pub fn replication_interval(&mut self, duration: Duration) -> &mut Self {
        self.check_lock();
        self.replication_interval = duration;
        self
    }

    pub fn state_delivery(&mut self, mode: DeliveryMode) -> &mut Self {
        self.check_lock();
        self.state_delivery = mode;
        self
    }

    pub fn first_sync_delivery(&mut self, mode: DeliveryMode) -> &mut Self {
        self.check_lock();
        self.first_sync_delivery = mode;
        self
    }

    pub fn rpc_delivery(&mut self, mode: DeliveryMode) -> &mut Self {
        self.check_lock();
        self.rpc_delivery = mode;
        self
    }

    /// Resolves the schema of `R` now rather than on first spawn, so schema
    /// problems are reported at startup
    pub fn add_replicated<R: Replicate>(&mut self) -> &mut Self {
        self.check_lock();
        self.register::<R>();
        self
    }

    // Non-panicking builder methods

    pub fn try_add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        plugin.build(self);
        Ok(self)
    }

    pub fn try_replication_interval(&mut self, duration: Duration) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.replication_interval = duration;
        Ok(self)
    }

    pub fn try_state_delivery(&mut self, mode: DeliveryMode) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.state_delivery = mode;
        Ok(self)
    }

    pub fn try_first_sync_delivery(&mut self, mode: DeliveryMode) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.first_sync_delivery = mode;
        Ok(self)
    }

    pub fn try_rpc_delivery(&mut self, mode: DeliveryMode) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.rpc_delivery = mode;
        Ok(self)
    }

    pub fn try_add_replicated<R: Replicate>(&mut self) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.register::<R>();
        Ok(self)
    }

    fn register<R: Replicate>(&mut self) {
        let schema = SchemaRegistry::resolve::<R>();
        if self
            .replicated_types
            .iter()
            .any(|registered| Arc::ptr_eq(&registered.schema, &schema))
        {
            return;
        }
        self.replicated_types.push(RegisteredType { schema });
    }

    pub fn replicated_types(&self) -> &[RegisteredType] {
        &self.replicated_types
    }

    /// Combined fingerprint of every registered type, in registration order.
    /// Peers built from the same declarations report the same value.
    pub fn fingerprint(&self) -> u64 {
        self.replicated_types.iter().fold(0u64, |acc, registered| {
            acc.rotate_left(5) ^ registered.fingerprint()
        })
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    /// Checks if protocol is locked without panicking
    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
