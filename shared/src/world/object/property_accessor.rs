use crate::world::{
    object::{error::AccessorError, replicate::Replicate},
    schema::{
        field_schema::FieldSchema, primitive_kind::PrimitiveKind,
        replicated_value::ReplicatedValue,
    },
};

/// Typed binding to one replicated field of one object.
///
/// Remembers the value it last observed, which is what `changed` compares
/// against.
#[derive(Clone, Debug)]
pub struct PropertyAccessor {
    type_name: &'static str,
    field_count: usize,
    index: usize,
    kind: PrimitiveKind,
    last_observed: ReplicatedValue,
}

impl PropertyAccessor {
    /// Binds to field `index` of `object`, caching its current value
    pub fn new<R: Replicate + ?Sized>(
        schema: &FieldSchema,
        index: usize,
        object: &R,
    ) -> Result<Self, AccessorError> {
        let out_of_range = || AccessorError::FieldOutOfRange {
            type_name: schema.type_name(),
            index,
            field_count: schema.field_count(),
        };
        let kind = schema.field(index).ok_or_else(out_of_range)?.kind;
        let value = object.read_field(index).ok_or_else(out_of_range)?;
        value.check_kind(kind)?;

        Ok(Self {
            type_name: schema.type_name(),
            field_count: schema.field_count(),
            index,
            kind,
            last_observed: value,
        })
    }

    /// Builds one accessor per declared field, in field order
    pub fn for_all_fields<R: Replicate + ?Sized>(
        schema: &FieldSchema,
        object: &R,
    ) -> Result<Vec<Self>, AccessorError> {
        (0..schema.field_count())
            .map(|index| Self::new(schema, index, object))
            .collect()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn last_observed(&self) -> &ReplicatedValue {
        &self.last_observed
    }

    pub fn get<R: Replicate + ?Sized>(&self, object: &R) -> Result<ReplicatedValue, AccessorError> {
        let value = object
            .read_field(self.index)
            .ok_or(AccessorError::FieldOutOfRange {
                type_name: self.type_name,
                index: self.index,
                field_count: self.field_count,
            })?;
        value.check_kind(self.kind)?;
        Ok(value)
    }

    /// Writes `value` into the field. The value must match the declared kind.
    pub fn set<R: Replicate + ?Sized>(
        &self,
        object: &mut R,
        value: ReplicatedValue,
    ) -> Result<(), AccessorError> {
        value.check_kind(self.kind)?;
        object.write_field(self.index, value)
    }

    /// Whether the field differs from the last observed value. The current
    /// value becomes the new last observed value.
    pub fn changed<R: Replicate + ?Sized>(&mut self, object: &R) -> bool {
        let Some(current) = object.read_field(self.index) else {
            return false;
        };
        if current.same_as(&self.last_observed) {
            return false;
        }
        self.last_observed = current;
        true
    }
}
