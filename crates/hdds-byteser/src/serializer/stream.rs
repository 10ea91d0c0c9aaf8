// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Blocking stream surfaces.
//!
//! Frame: `[len: u32 LE][record: len bytes]`. The prefix is read first so the
//! decoder knows how many bytes to pull; everything after that is a plain
//! buffer decode.

use super::ByteSerializer;
use crate::config::FRAME_PREFIX_LEN;
use crate::error::Result;
use crate::types::TypeIdentity;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

impl ByteSerializer {
    /// Write one framed record to a blocking stream.
    ///
    /// Returns the bytes pushed to the stream, prefix included.
    pub fn serialize_to_stream<T: TypeIdentity>(
        &self,
        stream: &mut dyn Write,
        value: Option<&T>,
    ) -> Result<usize> {
        self.serialize_to_writer(stream, value)
    }

    /// Read one framed record from a blocking stream.
    ///
    /// Returns the bytes pulled from the stream, prefix included.
    pub fn deserialize_from_stream<T: TypeIdentity>(
        &self,
        stream: &mut dyn Read,
    ) -> Result<(usize, Option<T>)> {
        self.deserialize_from_reader(stream)
    }

    /// Generic form of [`ByteSerializer::serialize_to_stream`].
    pub fn serialize_to_writer<T, W>(&self, writer: &mut W, value: Option<&T>) -> Result<usize>
    where
        T: TypeIdentity,
        W: Write + ?Sized,
    {
        let record = self.serialize_nullable(value)?;
        self.check_frame_len(record.len())?;

        writer.write_u32::<LittleEndian>(record.len() as u32)?;
        writer.write_all(&record)?;
        writer.flush()?;

        log::trace!(
            "[stream] wrote {} record ({} bytes)",
            std::any::type_name::<T>(),
            record.len()
        );
        Ok(FRAME_PREFIX_LEN + record.len())
    }

    /// Generic form of [`ByteSerializer::deserialize_from_stream`].
    pub fn deserialize_from_reader<T, R>(&self, reader: &mut R) -> Result<(usize, Option<T>)>
    where
        T: TypeIdentity,
        R: Read + ?Sized,
    {
        let len = reader.read_u32::<LittleEndian>()? as usize;
        self.check_frame_len(len)?;

        let mut frame = vec![0u8; len];
        reader.read_exact(&mut frame)?;

        let (used, value) = self.decode_frame::<T>(&frame).map_err(|e| {
            log::debug!(
                "[stream] failed to decode {} frame ({} bytes): {}",
                std::any::type_name::<T>(),
                len,
                e
            );
            e
        })?;
        Ok((FRAME_PREFIX_LEN + used, value))
    }
}
