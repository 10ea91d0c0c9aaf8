// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors for payload buffers.
//!
//! All multi-byte values are little-endian. Records are dense: there is no
//! alignment padding anywhere.

use crate::error::{CodecError, Result};

/// Mutable cursor for writing (bounds-checked, zero-copy)
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    pub fn write_u32_le(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a collection count (`u32`).
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let count = u32::try_from(count)
            .map_err(|_| CodecError::invalid(format!("count {} exceeds u32", count)))?;
        self.write_u32_le(count)
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let end = self.offset + data.len();
        if end > self.buffer.len() {
            return Err(CodecError::BufferTooSmall {
                needed: end,
                available: self.buffer.len(),
            });
        }
        self.buffer[self.offset..end].copy_from_slice(data);
        self.offset = end;
        Ok(())
    }

    /// Unwritten tail of the buffer, for handing to a nested encoder.
    pub fn tail(&mut self) -> &mut [u8] {
        &mut self.buffer[self.offset..]
    }

    /// Advance past bytes a nested encoder wrote into [`CursorMut::tail`].
    pub fn advance(&mut self, len: usize) -> Result<()> {
        let end = self.offset + len;
        if end > self.buffer.len() {
            return Err(CodecError::BufferTooSmall {
                needed: end,
                available: self.buffer.len(),
            });
        }
        self.offset = end;
        Ok(())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}

/// Immutable cursor for reading (bounds-checked, zero-copy)
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a collection count written by [`CursorMut::write_count`].
    pub fn read_count(&mut self) -> Result<usize> {
        let count = self.read_u32_le()?;
        usize::try_from(count)
            .map_err(|_| CodecError::invalid(format!("count {} exceeds platform capacity", count)))
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(CodecError::Truncated {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Unread tail of the buffer, for handing to a nested decoder.
    pub fn tail(&self) -> &'a [u8] {
        &self.buffer[self.offset..]
    }

    /// Advance past bytes a nested decoder consumed from [`Cursor::tail`].
    pub fn advance(&mut self, len: usize) -> Result<()> {
        if len > self.remaining() {
            return Err(CodecError::Truncated {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        self.offset += len;
        Ok(())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}
