/// The value types a replicated field may have
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Byte,
    SByte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Bool,
    String,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::Byte,
        PrimitiveKind::SByte,
        PrimitiveKind::Int16,
        PrimitiveKind::UInt16,
        PrimitiveKind::Int32,
        PrimitiveKind::UInt32,
        PrimitiveKind::Int64,
        PrimitiveKind::UInt64,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
        PrimitiveKind::Bool,
        PrimitiveKind::String,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::SByte => "sbyte",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::UInt16 => "uint16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::UInt32 => "uint32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::UInt64 => "uint64",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::String => "string",
        }
    }

    /// Encoded size of every value of this kind, or None for strings
    pub fn fixed_byte_length(&self) -> Option<usize> {
        match self {
            PrimitiveKind::Byte | PrimitiveKind::SByte | PrimitiveKind::Bool => Some(1),
            PrimitiveKind::Int16 | PrimitiveKind::UInt16 => Some(2),
            PrimitiveKind::Int32 | PrimitiveKind::UInt32 | PrimitiveKind::Float32 => Some(4),
            PrimitiveKind::Int64 | PrimitiveKind::UInt64 | PrimitiveKind::Float64 => Some(8),
            PrimitiveKind::String => None,
        }
    }

    // Stable per-kind tag, only used for schema fingerprints
    pub(crate) fn tag(&self) -> u8 {
        match self {
            PrimitiveKind::Byte => 0,
            PrimitiveKind::SByte => 1,
            PrimitiveKind::Int16 => 2,
            PrimitiveKind::UInt16 => 3,
            PrimitiveKind::Int32 => 4,
            PrimitiveKind::UInt32 => 5,
            PrimitiveKind::Int64 => 6,
            PrimitiveKind::UInt64 => 7,
            PrimitiveKind::Float32 => 8,
            PrimitiveKind::Float64 => 9,
            PrimitiveKind::Bool => 10,
            PrimitiveKind::String => 11,
        }
    }
}
