//! Bounds-checked sequential reads over the input buffer.
//!
//! [`Cursor`] wraps the immutable input buffer and a read offset. It is the
//! single chokepoint through which every byte of an IPD file is consumed:
//! all higher layers (header, directory, records, fields) read through it,
//! so out-of-bounds access is impossible anywhere in the decoder. Reads
//! advance the offset on success only; a failed read leaves the offset
//! unchanged so the reported error position is exact and reproducible. The
//! offset never moves backward.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::IpdError;

/// Sequential reader over an immutable byte buffer.
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Cursor { data, offset: 0 }
    }

    /// Current read offset from the start of the buffer.
    pub fn position(&self) -> u64 {
        self.offset as u64
    }

    /// Number of unread bytes remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Returns true once every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.offset == self.data.len()
    }

    /// Read exactly `n` bytes, advancing the offset.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], IpdError> {
        if self.remaining() < n {
            return Err(IpdError::UnexpectedEndOfStream {
                offset: self.position(),
            });
        }
        let slice = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, IpdError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16, IpdError> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    /// Read a big-endian u16 (used only for the header's database count).
    pub fn read_u16_be(&mut self) -> Result<u16, IpdError> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, IpdError> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read a big-endian u32 (used only for record unique ids).
    pub fn read_u32_be(&mut self) -> Result<u32, IpdError> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64, IpdError> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }
}
