use tinynet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::world::schema::error::SchemaError;

/// Number of bits in a type's dirty flag word
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirtyWidth {
    /// No replicated fields, nothing is ever written
    Zero,
    Eight,
    Sixteen,
    ThirtyTwo,
    SixtyFour,
}

impl DirtyWidth {
    pub const MAX_FIELDS: usize = 64;

    /// Smallest width with at least one bit per field
    pub fn for_field_count(type_name: &'static str, field_count: usize) -> Result<Self, SchemaError> {
        match field_count {
            0 => Ok(DirtyWidth::Zero),
            1..=8 => Ok(DirtyWidth::Eight),
            9..=16 => Ok(DirtyWidth::Sixteen),
            17..=32 => Ok(DirtyWidth::ThirtyTwo),
            33..=64 => Ok(DirtyWidth::SixtyFour),
            _ => Err(SchemaError::TooManyFields {
                type_name,
                field_count,
                max: Self::MAX_FIELDS,
            }),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            DirtyWidth::Zero => 0,
            DirtyWidth::Eight => 8,
            DirtyWidth::Sixteen => 16,
            DirtyWidth::ThirtyTwo => 32,
            DirtyWidth::SixtyFour => 64,
        }
    }

    pub fn byte_length(&self) -> usize {
        self.bits() as usize / 8
    }
}

/// One bit per replicated field, set while the field has a change that was
/// not sent yet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirtyFlags {
    width: DirtyWidth,
    bits: u64,
}

impl DirtyFlags {
    pub fn new(width: DirtyWidth) -> Self {
        Self { width, bits: 0 }
    }

    pub fn width(&self) -> DirtyWidth {
        self.width
    }

    /// Raw flag word, bit `i` is field `i`
    pub fn word(&self) -> u64 {
        self.bits
    }

    pub fn bit(&self, index: usize) -> bool {
        if index >= self.width.bits() as usize {
            return false;
        }
        self.bits & (1 << index) != 0
    }

    /// Sets or clears the bit for field `index`. Indices past the width are
    /// ignored.
    pub fn set_bit(&mut self, index: usize, value: bool) {
        if index >= self.width.bits() as usize {
            return;
        }
        if value {
            self.bits |= 1 << index;
        } else {
            self.bits &= !(1 << index);
        }
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn is_clear(&self) -> bool {
        self.bits == 0
    }

    pub fn or(&mut self, other: &DirtyFlags) {
        self.bits |= other.bits & self.mask();
    }

    /// Indices of all set bits, ascending
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width.bits() as usize).filter(move |index| self.bit(*index))
    }

    fn mask(&self) -> u64 {
        match self.width {
            DirtyWidth::Zero => 0,
            DirtyWidth::SixtyFour => u64::MAX,
            other => (1u64 << other.bits()) - 1,
        }
    }

    // Serialization / deserialization

    /// Writes the flag word in its width, little-endian
    pub fn write(&self, writer: &mut dyn ByteWrite) {
        match self.width {
            DirtyWidth::Zero => {}
            DirtyWidth::Eight => (self.bits as u8).ser(writer),
            DirtyWidth::Sixteen => (self.bits as u16).ser(writer),
            DirtyWidth::ThirtyTwo => (self.bits as u32).ser(writer),
            DirtyWidth::SixtyFour => self.bits.ser(writer),
        }
    }

    pub fn read(width: DirtyWidth, reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let bits = match width {
            DirtyWidth::Zero => 0,
            DirtyWidth::Eight => u64::from(u8::de(reader)?),
            DirtyWidth::Sixteen => u64::from(u16::de(reader)?),
            DirtyWidth::ThirtyTwo => u64::from(u32::de(reader)?),
            DirtyWidth::SixtyFour => u64::de(reader)?,
        };
        Ok(Self { width, bits })
    }
}
