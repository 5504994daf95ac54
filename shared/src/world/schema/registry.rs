use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use log::debug;

use crate::{
    messages::rpc::error::RpcError,
    types::RpcIndex,
    world::{
        object::replicate::Replicate,
        schema::{field_schema::FieldSchema, schema_builder::SchemaBuilder},
    },
};

type SchemaMap = HashMap<TypeId, Arc<FieldSchema>>;

static SCHEMAS: OnceLock<RwLock<SchemaMap>> = OnceLock::new();

fn schemas() -> &'static RwLock<SchemaMap> {
    SCHEMAS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Process-wide cache of [`FieldSchema`]s, keyed by concrete type.
///
/// A schema is built the first time its type is requested and never changes
/// afterwards. Entries are never evicted.
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Returns the schema of `T`, building it on first request
    pub fn resolve<T: Replicate>() -> Arc<FieldSchema> {
        let type_id = TypeId::of::<T>();

        // the map only ever grows, a poisoned lock still holds valid entries
        if let Some(schema) = schemas()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return schema.clone();
        }

        let name = type_name::<T>();
        let mut builder = SchemaBuilder::new(name);
        T::declare(&mut builder);
        let schema = builder.build(name);

        let mut map = schemas().write().unwrap_or_else(PoisonError::into_inner);
        map.entry(type_id)
            .or_insert_with(|| {
                debug!(
                    "resolved schema for {}: {} fields, {} rpcs",
                    name,
                    schema.field_count(),
                    schema.rpc_count()
                );
                Arc::new(schema)
            })
            .clone()
    }

    pub fn is_resolved<T: Replicate>() -> bool {
        schemas()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    pub fn field_count<T: Replicate>() -> usize {
        Self::resolve::<T>().field_count()
    }

    pub fn rpc_count<T: Replicate>() -> usize {
        Self::resolve::<T>().rpc_count()
    }

    pub fn rpc_index<T: Replicate>(name: &str) -> Result<RpcIndex, RpcError> {
        Self::resolve::<T>().rpc_index(name)
    }
}
