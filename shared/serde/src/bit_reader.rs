use crate::SerdeErr;

/// Reads bits out of a byte buffer in the order a BitWriter wrote them
pub struct BitReader<'b> {
    buffer: &'b [u8],
    buffer_index: usize,
    scratch: u8,
    scratch_index: u8,
    bits_read: usize,
    depth: usize,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            buffer_index: 0,
            scratch: 0,
            scratch_index: 0,
            bits_read: 0,
            depth: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.scratch_index == 0 {
            let Some(byte) = self.buffer.get(self.buffer_index) else {
                return Err(SerdeErr::UnexpectedEnd {
                    bits_read: self.bits_read,
                });
            };
            self.scratch = *byte;
            self.buffer_index += 1;
            self.scratch_index = 8;
        }

        let bit = self.scratch & 1 != 0;
        self.scratch >>= 1;
        self.scratch_index -= 1;
        self.bits_read += 1;

        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output = 0;
        for i in 0..8 {
            if self.read_bit()? {
                output |= 1 << i;
            }
        }
        Ok(output)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, SerdeErr> {
        let mut output = Vec::with_capacity(count.min(self.bytes_remaining()));
        for _ in 0..count {
            output.push(self.read_byte()?);
        }
        Ok(output)
    }

    pub fn bits_read(&self) -> usize {
        self.bits_read
    }

    /// Whole bytes not yet touched by the reader
    pub fn bytes_remaining(&self) -> usize {
        self.buffer.len() - self.buffer_index
    }

    /// Enters one level of a nested value. Fails once `limit` levels are
    /// already open, so a hostile buffer cannot recurse without bound.
    pub fn enter_nested(&mut self, limit: usize) -> Result<(), SerdeErr> {
        if self.depth >= limit {
            return Err(SerdeErr::NestingLimitExceeded { limit });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Nested values currently being read
    pub fn depth(&self) -> usize {
        self.depth
    }
}
