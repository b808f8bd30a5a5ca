// Bounds-checked big-endian reader over a capture payload

use crate::core::constants::MAC_ADDRESS_SIZE;
use crate::core::error::{PnmError, Result};
use crate::core::mac::MacAddress;

pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(PnmError::TruncatedPayload {
                field,
                needed: n,
                available: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.take(1, field)?[0])
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        let b = self.take(2, field)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_i16(&mut self, field: &'static str) -> Result<i16> {
        let b = self.take(2, field)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        let b = self.take(4, field)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_mac(&mut self, field: &'static str) -> Result<MacAddress> {
        let b = self.take(MAC_ADDRESS_SIZE, field)?;
        let mut octets = [0u8; MAC_ADDRESS_SIZE];
        octets.copy_from_slice(b);
        Ok(MacAddress::new(octets))
    }

    /// Reads a u32 byte count followed by that many bytes.
    pub fn read_declared(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let len = self.read_u32(field)? as usize;
        self.take(len, field)
    }

    /// Every byte of the payload must belong to a declared field.
    pub fn finish(&self, context: &str) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(PnmError::LengthMismatch(format!(
                "{} trailing bytes after {}",
                n, context
            ))),
        }
    }
}
