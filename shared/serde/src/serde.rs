use crate::{byte_reader::ByteReader, error::SerdeErr, stream_writer::ByteWrite};

/// A type that can be written into & read out of a tinynet payload
pub trait Serde: Sized + Clone + PartialEq {
    /// Writes the value into the outgoing stream
    fn ser(&self, writer: &mut dyn ByteWrite);

    /// Reads a value out of the incoming stream
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    /// Number of bytes `ser` will write for this value
    fn byte_length(&self) -> usize;
}

/// Implemented by types whose encoded size never depends on their value
pub trait ConstByteLength {
    fn const_byte_length() -> usize;
}
