use tinynet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::world::{object::error::AccessorError, schema::primitive_kind::PrimitiveKind};

/// The current value of one replicated field, tagged with its kind
#[derive(Clone, Debug, PartialEq)]
pub enum ReplicatedValue {
    Byte(u8),
    SByte(i8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    String(String),
}

impl ReplicatedValue {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            ReplicatedValue::Byte(_) => PrimitiveKind::Byte,
            ReplicatedValue::SByte(_) => PrimitiveKind::SByte,
            ReplicatedValue::Int16(_) => PrimitiveKind::Int16,
            ReplicatedValue::UInt16(_) => PrimitiveKind::UInt16,
            ReplicatedValue::Int32(_) => PrimitiveKind::Int32,
            ReplicatedValue::UInt32(_) => PrimitiveKind::UInt32,
            ReplicatedValue::Int64(_) => PrimitiveKind::Int64,
            ReplicatedValue::UInt64(_) => PrimitiveKind::UInt64,
            ReplicatedValue::Float32(_) => PrimitiveKind::Float32,
            ReplicatedValue::Float64(_) => PrimitiveKind::Float64,
            ReplicatedValue::Bool(_) => PrimitiveKind::Bool,
            ReplicatedValue::String(_) => PrimitiveKind::String,
        }
    }

    /// The zero value of a kind
    pub fn default_for(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Byte => ReplicatedValue::Byte(0),
            PrimitiveKind::SByte => ReplicatedValue::SByte(0),
            PrimitiveKind::Int16 => ReplicatedValue::Int16(0),
            PrimitiveKind::UInt16 => ReplicatedValue::UInt16(0),
            PrimitiveKind::Int32 => ReplicatedValue::Int32(0),
            PrimitiveKind::UInt32 => ReplicatedValue::UInt32(0),
            PrimitiveKind::Int64 => ReplicatedValue::Int64(0),
            PrimitiveKind::UInt64 => ReplicatedValue::UInt64(0),
            PrimitiveKind::Float32 => ReplicatedValue::Float32(0.0),
            PrimitiveKind::Float64 => ReplicatedValue::Float64(0.0),
            PrimitiveKind::Bool => ReplicatedValue::Bool(false),
            PrimitiveKind::String => ReplicatedValue::String(String::new()),
        }
    }

    /// Exact comparison used for change detection. Floats compare by bit
    /// pattern with no epsilon, so a NaN equals the same NaN and 0.0 differs
    /// from -0.0.
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (ReplicatedValue::Float32(a), ReplicatedValue::Float32(b)) => a.to_bits() == b.to_bits(),
            (ReplicatedValue::Float64(a), ReplicatedValue::Float64(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    pub fn check_kind(&self, expected: PrimitiveKind) -> Result<(), AccessorError> {
        let found = self.kind();
        if found == expected {
            Ok(())
        } else {
            Err(AccessorError::KindMismatch { expected, found })
        }
    }

    // Serialization / deserialization

    /// Writes the value with the fixed wire encoding of its kind
    pub fn write(&self, writer: &mut dyn ByteWrite) {
        match self {
            ReplicatedValue::Byte(value) => value.ser(writer),
            ReplicatedValue::SByte(value) => value.ser(writer),
            ReplicatedValue::Int16(value) => value.ser(writer),
            ReplicatedValue::UInt16(value) => value.ser(writer),
            ReplicatedValue::Int32(value) => value.ser(writer),
            ReplicatedValue::UInt32(value) => value.ser(writer),
            ReplicatedValue::Int64(value) => value.ser(writer),
            ReplicatedValue::UInt64(value) => value.ser(writer),
            ReplicatedValue::Float32(value) => value.ser(writer),
            ReplicatedValue::Float64(value) => value.ser(writer),
            ReplicatedValue::Bool(value) => value.ser(writer),
            ReplicatedValue::String(value) => value.ser(writer),
        }
    }

    /// Reads one value of the given kind
    pub fn read(kind: PrimitiveKind, reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let value = match kind {
            PrimitiveKind::Byte => ReplicatedValue::Byte(u8::de(reader)?),
            PrimitiveKind::SByte => ReplicatedValue::SByte(i8::de(reader)?),
            PrimitiveKind::Int16 => ReplicatedValue::Int16(i16::de(reader)?),
            PrimitiveKind::UInt16 => ReplicatedValue::UInt16(u16::de(reader)?),
            PrimitiveKind::Int32 => ReplicatedValue::Int32(i32::de(reader)?),
            PrimitiveKind::UInt32 => ReplicatedValue::UInt32(u32::de(reader)?),
            PrimitiveKind::Int64 => ReplicatedValue::Int64(i64::de(reader)?),
            PrimitiveKind::UInt64 => ReplicatedValue::UInt64(u64::de(reader)?),
            PrimitiveKind::Float32 => ReplicatedValue::Float32(f32::de(reader)?),
            PrimitiveKind::Float64 => ReplicatedValue::Float64(f64::de(reader)?),
            PrimitiveKind::Bool => ReplicatedValue::Bool(bool::de(reader)?),
            PrimitiveKind::String => ReplicatedValue::String(String::de(reader)?),
        };
        Ok(value)
    }

    pub fn byte_length(&self) -> usize {
        match self {
            ReplicatedValue::String(value) => value.byte_length(),
            other => other.kind().fixed_byte_length().unwrap_or_default(),
        }
    }
}

macro_rules! impl_value_conversions {
    ($($variant:ident => $inner:ty),* $(,)?) => {
        $(
            impl From<$inner> for ReplicatedValue {
                fn from(value: $inner) -> Self {
                    ReplicatedValue::$variant(value)
                }
            }

            impl TryFrom<ReplicatedValue> for $inner {
                type Error = AccessorError;

                fn try_from(value: ReplicatedValue) -> Result<Self, Self::Error> {
                    match value {
                        ReplicatedValue::$variant(inner) => Ok(inner),
                        other => Err(AccessorError::KindMismatch {
                            expected: PrimitiveKind::$variant,
                            found: other.kind(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_value_conversions!(
    Byte => u8,
    SByte => i8,
    Int16 => i16,
    UInt16 => u16,
    Int32 => i32,
    UInt32 => u32,
    Int64 => i64,
    UInt64 => u64,
    Float32 => f32,
    Float64 => f64,
    Bool => bool,
    String => String,
);

impl From<&str> for ReplicatedValue {
    fn from(value: &str) -> Self {
        ReplicatedValue::String(value.to_string())
    }
}
