// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Async stream surfaces (tokio).
//!
//! Same frame as the blocking surfaces. Sizing, encoding and decoding run
//! synchronously; the futures only suspend inside the stream calls.
//! Dropping a future mid-frame leaves the stream position unspecified, and no
//! value is produced.

use super::ByteSerializer;
use crate::config::FRAME_PREFIX_LEN;
use crate::error::Result;
use crate::types::TypeIdentity;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

impl ByteSerializer {
    /// Write one framed record to an async stream.
    pub async fn serialize_to_async_writer<T, W>(
        &self,
        writer: &mut W,
        value: Option<&T>,
    ) -> Result<usize>
    where
        T: TypeIdentity,
        W: AsyncWrite + Unpin + ?Sized,
    {
        let record = self.serialize_nullable(value)?;
        self.check_frame_len(record.len())?;

        writer.write_u32_le(record.len() as u32).await?;
        writer.write_all(&record).await?;
        writer.flush().await?;

        log::trace!(
            "[stream] wrote {} record ({} bytes, async)",
            std::any::type_name::<T>(),
            record.len()
        );
        Ok(FRAME_PREFIX_LEN + record.len())
    }

    /// Read one framed record from an async stream.
    pub async fn deserialize_from_async_reader<T, R>(
        &self,
        reader: &mut R,
    ) -> Result<(usize, Option<T>)>
    where
        T: TypeIdentity,
        R: AsyncRead + Unpin + ?Sized,
    {
        let len = reader.read_u32_le().await? as usize;
        self.check_frame_len(len)?;

        let mut frame = vec![0u8; len];
        reader.read_exact(&mut frame).await?;

        let (used, value) = self.decode_frame::<T>(&frame).map_err(|e| {
            log::debug!(
                "[stream] failed to decode {} frame ({} bytes, async): {}",
                std::any::type_name::<T>(),
                len,
                e
            );
            e
        })?;
        Ok((FRAME_PREFIX_LEN + used, value))
    }
}
