use crate::{byte_reader::ByteReader, error::SerdeErr, serde::Serde, stream_writer::ByteWrite};

/// Longest string payload (in UTF-8 bytes) that fits behind the u32 length prefix
pub const MAX_STRING_BYTES: usize = u32::MAX as usize;

// Strings are a u32 little-endian byte count followed by UTF-8 bytes.
impl Serde for String {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let bytes = within_limit(self).as_bytes();
        (bytes.len() as u32).ser(writer);
        writer.write_bytes(bytes);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = u32::de(reader)? as usize;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr::InvalidUtf8 { length })
    }

    fn byte_length(&self) -> usize {
        4 + within_limit(self).len()
    }
}

// Only reachable on 64-bit targets with strings over 4 GiB
fn within_limit(value: &str) -> &str {
    if value.len() <= MAX_STRING_BYTES {
        return value;
    }
    let mut end = MAX_STRING_BYTES;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
