//! Byte buffer utilities for parsing binary data structures.
//!
//! This module provides `ByteBuffer`, a position-tracking byte reader over an
//! already-loaded buffer. Every read either consumes exactly its width or fails
//! without moving the cursor, which is what keeps the score decoder record-atomic.

/// A read that needed more bytes than the buffer had left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortRead {
    /// Cursor position at which the read was attempted.
    pub offset: usize,
    /// Bytes the read required.
    pub needed: usize,
    /// Bytes that were actually left.
    pub remaining: usize,
}

/// A position-tracking byte reader for parsing little-endian binary data.
///
/// # Example
///
/// ```
/// use chscore_core::scoredata::ByteBuffer;
///
/// let data = [0x05, 0x00, 0x00, 0x78, 0x56, 0x34, 0x12];
/// let mut buf = ByteBuffer::new(&data);
///
/// assert_eq!(buf.read_u24().unwrap(), 5);
/// assert_eq!(buf.read_u32().unwrap(), 0x12345678);
/// assert_eq!(buf.position(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteBuffer<'a> {
    /// Creates a new `ByteBuffer` wrapping the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of bytes remaining from the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Reads the specified number of bytes and advances the position.
    ///
    /// # Errors
    ///
    /// Returns a [`ShortRead`] if there are not enough bytes remaining. The
    /// position is left unchanged in that case.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], ShortRead> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(ShortRead {
                offset: self.pos,
                needed: count,
                remaining,
            });
        }

        let end = self.pos + count;
        let result = &self.data[self.pos..end];
        self.pos = end;
        Ok(result)
    }

    /// Reads a fixed-size byte array and advances the position.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ShortRead> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer and advances the position.
    pub fn read_u8(&mut self) -> Result<u8, ShortRead> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Reads an unsigned 16-bit integer (little-endian) and advances the position.
    pub fn read_u16(&mut self) -> Result<u16, ShortRead> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads an unsigned 24-bit integer (little-endian) and advances the position.
    ///
    /// The three bytes are copied into the low end of a 4-byte buffer whose
    /// most-significant byte stays zero, and that buffer is decoded as a
    /// little-endian `u32`.
    pub fn read_u24(&mut self) -> Result<u32, ShortRead> {
        let bytes = self.read_bytes(3)?;
        let mut widened = [0u8; 4];
        widened[..3].copy_from_slice(bytes);
        Ok(u32::from_le_bytes(widened))
    }

    /// Reads an unsigned 32-bit integer (little-endian) and advances the position.
    pub fn read_u32(&mut self) -> Result<u32, ShortRead> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
