// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field-by-field helpers for structured types.
//!
//! A composite payload is the concatenation of one full record per field, in
//! declaration order. Each helper resolves the field type's handler through
//! the registry and advances by exactly the bytes that handler reports.
//!
//! ```ignore
//! fn payload_size(&self, v: &Reading, registry: &HandlerRegistry) -> Result<usize> {
//!     let mut size = SizeEstimator::new(registry);
//!     size.field(Some(&v.sensor_id))?.field(v.label.as_ref())?;
//!     Ok(size.total())
//! }
//!
//! fn encode_payload(&self, dst: &mut [u8], v: &Reading, registry: &HandlerRegistry) -> Result<usize> {
//!     let mut writer = FieldWriter::new(dst, registry);
//!     writer.field(Some(&v.sensor_id))?.field(v.label.as_ref())?;
//!     Ok(writer.finish())
//! }
//!
//! fn decode_payload(&self, src: &[u8], registry: &HandlerRegistry) -> Result<(usize, Reading)> {
//!     let mut reader = FieldReader::new(src, registry);
//!     let sensor_id = reader.required()?;
//!     let label = reader.field()?;
//!     Ok((reader.finish(), Reading { sensor_id, label }))
//! }
//! ```

use crate::error::{CodecError, Result};
use crate::registry::HandlerRegistry;
use crate::ser::{Cursor, CursorMut};
use crate::types::TypeIdentity;

/// Sums the record sizes of a composite's fields.
pub struct SizeEstimator<'r> {
    registry: &'r HandlerRegistry,
    total: usize,
}

impl<'r> SizeEstimator<'r> {
    pub fn new(registry: &'r HandlerRegistry) -> Self {
        Self { registry, total: 0 }
    }

    pub fn field<F: TypeIdentity>(&mut self, value: Option<&F>) -> Result<&mut Self> {
        self.total += self.registry.resolve::<F>()?.estimate_size(value)?;
        Ok(self)
    }

    /// Account for raw payload bytes written outside of field records.
    pub fn bytes(&mut self, len: usize) -> &mut Self {
        self.total += len;
        self
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Writes a composite's field records back-to-back.
pub struct FieldWriter<'a, 'r> {
    cursor: CursorMut<'a>,
    registry: &'r HandlerRegistry,
}

impl<'a, 'r> FieldWriter<'a, 'r> {
    pub fn new(dst: &'a mut [u8], registry: &'r HandlerRegistry) -> Self {
        Self {
            cursor: CursorMut::new(dst),
            registry,
        }
    }

    pub fn field<F: TypeIdentity>(&mut self, value: Option<&F>) -> Result<&mut Self> {
        let base = self.cursor.offset();
        let written = self
            .registry
            .resolve::<F>()?
            .encode(self.cursor.tail(), value)
            .map_err(|e| e.at_offset(base))?;
        self.cursor.advance(written)?;
        Ok(self)
    }

    /// Raw access for payload bytes that are not field records.
    pub fn cursor(&mut self) -> &mut CursorMut<'a> {
        &mut self.cursor
    }

    /// Bytes written so far.
    pub fn finish(self) -> usize {
        self.cursor.offset()
    }
}

/// Reads a composite's field records in the order they were written.
pub struct FieldReader<'a, 'r> {
    cursor: Cursor<'a>,
    registry: &'r HandlerRegistry,
}

impl<'a, 'r> FieldReader<'a, 'r> {
    pub fn new(src: &'a [u8], registry: &'r HandlerRegistry) -> Self {
        Self {
            cursor: Cursor::new(src),
            registry,
        }
    }

    /// Next field, `None` if it was written as absent.
    pub fn field<F: TypeIdentity>(&mut self) -> Result<Option<F>> {
        let base = self.cursor.offset();
        let (used, value) = self
            .registry
            .resolve::<F>()?
            .decode(self.cursor.tail())
            .map_err(|e| e.at_offset(base))?;
        self.cursor.advance(used)?;
        Ok(value)
    }

    /// Next field, which must be present.
    pub fn required<F: TypeIdentity>(&mut self) -> Result<F> {
        let offset = self.cursor.offset();
        self.field::<F>()?.ok_or_else(|| {
            CodecError::invalid(format!(
                "required field of type {} is absent at offset {}",
                std::any::type_name::<F>(),
                offset
            ))
        })
    }

    /// Raw access for payload bytes that are not field records.
    pub fn cursor(&mut self) -> &mut Cursor<'a> {
        &mut self.cursor
    }

    /// Bytes consumed so far.
    pub fn finish(self) -> usize {
        self.cursor.offset()
    }
}
