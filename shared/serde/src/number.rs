use crate::{
    byte_reader::ByteReader, error::SerdeErr, serde::Serde, stream_writer::ByteWrite,
    ConstByteLength,
};

// Fixed-width numbers are always little-endian on the wire, independent of
// the host's native byte order.
macro_rules! impl_serde_for_number {
    ($($number:ty),*) => {
        $(
            impl Serde for $number {
                fn ser(&self, writer: &mut dyn ByteWrite) {
                    writer.write_bytes(&self.to_le_bytes());
                }

                fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                    Ok(<$number>::from_le_bytes(reader.read_array()?))
                }

                fn byte_length(&self) -> usize {
                    std::mem::size_of::<$number>()
                }
            }

            impl ConstByteLength for $number {
                fn const_byte_length() -> usize {
                    std::mem::size_of::<$number>()
                }
            }
        )*
    };
}

impl_serde_for_number!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

// Bools take a whole byte. Any non-zero byte reads back as true.
impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(reader.read_byte()? != 0)
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for bool {
    fn const_byte_length() -> usize {
        1
    }
}
