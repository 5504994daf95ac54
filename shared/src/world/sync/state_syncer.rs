use std::time::Instant;

use log::{debug, error, warn};

use tinynet_serde::{ByteReader, ByteWrite, ByteWriter};

use crate::{
    types::NetContext,
    world::{
        object::{dirty_flags::DirtyFlags, net_object::NetObject},
        schema::replicated_value::ReplicatedValue,
        sync::{
            error::SyncError,
            state_header::{StateHeader, SyncKind},
        },
    },
};

/// Marks changed fields dirty, and encodes & applies state messages.
///
/// Message layout: `[objectId:u32][kind:u8][flagWord?][values]`. The flag
/// word is omitted on first sync, where every field is written in
/// declaration order. Both peers must have resolved the same schema for the
/// object's type, which is not checked here.
pub struct StateSynchronizer {
    context: NetContext,
}

impl StateSynchronizer {
    pub fn new(context: NetContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &NetContext {
        &self.context
    }

    // Tick

    /// Clears the object's dirty flags, re-scans every field and flags the
    /// ones that changed since the last scan. Returns whether anything is
    /// dirty. Errors are logged, and leave the object untouched.
    pub fn tick(&self, object: &mut dyn NetObject, now: Instant) -> bool {
        match self.try_tick(object, now) {
            Ok(dirty) => dirty,
            // already reported when the schema was resolved
            Err(SyncError::TrackingDisabled { .. }) => false,
            Err(err) => {
                error!("StateSynchronizer::tick: {}", err);
                false
            }
        }
    }

    pub fn try_tick(&self, object: &mut dyn NetObject, now: Instant) -> Result<bool, SyncError> {
        if self.context.is_client() {
            debug!(
                "StateSynchronizer::tick(type={}) ignored, only the server tracks dirty state",
                object.type_name()
            );
            return Ok(false);
        }
        if object.network_id().is_none() {
            return Err(SyncError::MissingIdentity {
                type_name: object.type_name(),
            });
        }
        if object.dirty_flags().is_none() {
            return Err(SyncError::TrackingDisabled {
                type_name: object.type_name(),
            });
        }

        object.clear_dirty_flags();
        for index in 0..object.schema().field_count() {
            if object.field_changed(index) {
                object.set_dirty_flag(index, true);
            }
        }
        object.mark_sent(now);

        Ok(object.is_dirty())
    }

    // Encode

    /// Encodes a complete state message, or None if the object cannot be
    /// synchronized. Errors are logged.
    pub fn encode(&self, object: &dyn NetObject, kind: SyncKind) -> Option<Vec<u8>> {
        match self.try_encode(object, kind) {
            Ok(bytes) => Some(bytes),
            Err(SyncError::TrackingDisabled { .. }) => None,
            Err(err) => {
                error!("StateSynchronizer::encode: {}", err);
                None
            }
        }
    }

    pub fn try_encode(&self, object: &dyn NetObject, kind: SyncKind) -> Result<Vec<u8>, SyncError> {
        let mut writer = ByteWriter::new();
        self.write_state(object, kind, &mut writer)?;
        Ok(writer.to_bytes())
    }

    /// Writes a state message. Nothing is written if an error is returned.
    pub fn write_state(
        &self,
        object: &dyn NetObject,
        kind: SyncKind,
        writer: &mut dyn ByteWrite,
    ) -> Result<(), SyncError> {
        let type_name = object.type_name();
        let Some(network_id) = object.network_id() else {
            return Err(SyncError::MissingIdentity { type_name });
        };
        let Some(flags) = object.dirty_flags() else {
            return Err(SyncError::TrackingDisabled { type_name });
        };

        // gather values first so a failing accessor leaves the writer untouched
        let values = match kind {
            SyncKind::Delta => flags
                .ones()
                .map(|index| object.field_value(index))
                .collect::<Result<Vec<_>, _>>()?,
            SyncKind::FirstSync => (0..object.schema().field_count())
                .map(|index| object.field_value(index))
                .collect::<Result<Vec<_>, _>>()?,
        };

        StateHeader::new(network_id, kind).write(writer);
        if kind == SyncKind::Delta {
            flags.write(writer);
        }
        for value in &values {
            value.write(writer);
        }
        Ok(())
    }

    // Decode

    /// Reads a complete state message addressed to `object` and applies it
    pub fn decode(&self, object: &mut dyn NetObject, bytes: &[u8]) -> Result<StateHeader, SyncError> {
        let mut reader = ByteReader::new(bytes);
        let header = StateHeader::read(&mut reader)?;
        if let Some(expected) = object.network_id() {
            if expected != header.network_id {
                return Err(SyncError::NetworkIdMismatch {
                    expected,
                    found: header.network_id,
                });
            }
        }
        self.read_state(object, header.kind, &mut reader)?;
        if reader.bytes_remaining() > 0 {
            warn!(
                "StateSynchronizer::decode(id={}): {} trailing bytes ignored",
                header.network_id,
                reader.bytes_remaining()
            );
        }
        Ok(header)
    }

    /// Reads the body of a state message, after its header, and writes the
    /// values through the object's accessors. Nothing is applied unless the
    /// whole body reads cleanly.
    pub fn read_state(
        &self,
        object: &mut dyn NetObject,
        kind: SyncKind,
        reader: &mut ByteReader,
    ) -> Result<(), SyncError> {
        let schema = object.schema().clone();
        let type_name = schema.type_name();
        let Some(width) = schema.dirty_width() else {
            return Err(SyncError::TrackingDisabled { type_name });
        };

        let indices: Vec<usize> = match kind {
            SyncKind::Delta => DirtyFlags::read(width, reader)?.ones().collect(),
            SyncKind::FirstSync => (0..schema.field_count()).collect(),
        };

        let mut values = Vec::with_capacity(indices.len());
        for index in indices {
            let Some(field) = schema.field(index) else {
                return Err(SyncError::UnknownField {
                    type_name,
                    index,
                    field_count: schema.field_count(),
                });
            };
            values.push((index, ReplicatedValue::read(field.kind, reader)?));
        }

        for (index, value) in values {
            object.apply_field(index, value)?;
        }
        Ok(())
    }
}
