use crate::error::SerdeErr;

/// Cursor over an incoming payload
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.bytes_remaining();
        if count > remaining {
            return Err(SerdeErr::UnexpectedEnd {
                needed: count,
                remaining,
            });
        }
        let start = self.cursor;
        self.cursor += count;
        Ok(&self.buffer[start..self.cursor])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let bytes = self.read_bytes(N)?;
        let mut output = [0u8; N];
        output.copy_from_slice(bytes);
        Ok(output)
    }

    /// Everything not yet read, without advancing the cursor
    pub fn remaining(&self) -> &'b [u8] {
        &self.buffer[self.cursor..]
    }

    /// Consumes and returns everything not yet read
    pub fn read_to_end(&mut self) -> &'b [u8] {
        let rest = self.remaining();
        self.cursor = self.buffer.len();
        rest
    }

    pub fn bytes_remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn position(&self) -> usize {
        self.cursor
    }
}
